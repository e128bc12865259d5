//! AWS Signature Version 4 (`AWS4-HMAC-SHA256`)

use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::providers::common::hmac_sha256;
use crate::utils::log_sanitizer::truncate_for_log;

use super::Route53Provider;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Who signs and for which region/service.
pub(crate) struct SigningScope<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
    pub service: &'a str,
}

impl Route53Provider {
    /// Build the `Authorization` header for a Route53 request.
    ///
    /// `headers` must contain every header that is sent and signed (at least `host`
    /// and `x-amz-date`).
    pub(crate) fn sign(
        &self,
        method: &str,
        path: &str,
        query: &[(String, String)],
        headers: &[(String, String)],
        payload: &str,
        amz_date: &str,
    ) -> String {
        let scope = SigningScope {
            access_key_id: &self.access_key_id,
            secret_access_key: &self.secret_access_key,
            region: &self.endpoint.signing_region,
            service: super::ROUTE53_SERVICE,
        };
        authorization_header(&scope, method, path, query, headers, payload, amz_date)
    }
}

/// Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html>
pub(crate) fn authorization_header(
    scope: &SigningScope<'_>,
    method: &str,
    path: &str,
    query: &[(String, String)],
    headers: &[(String, String)],
    payload: &str,
    amz_date: &str,
) -> String {
    // 1. Canonical request
    let mut sorted_headers: Vec<(String, &str)> = headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.trim()))
        .collect();
    sorted_headers.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical_headers = sorted_headers
        .iter()
        .fold(String::new(), |mut acc, (k, v)| {
            let _ = writeln!(acc, "{k}:{v}");
            acc
        });

    let signed_headers = sorted_headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let hashed_payload = hex::encode(Sha256::digest(payload.as_bytes()));

    let canonical_request = format!(
        "{method}\n{}\n{}\n{canonical_headers}\n{signed_headers}\n{hashed_payload}",
        canonical_uri(path),
        canonical_query(query),
    );

    log::debug!("CanonicalRequest:\n{}", truncate_for_log(&canonical_request));

    // 2. String to sign
    let date = amz_date.get(..8).unwrap_or(amz_date);
    let credential_scope = format!(
        "{date}/{}/{}/aws4_request",
        scope.region, scope.service
    );
    let hashed_canonical_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    let string_to_sign =
        format!("{ALGORITHM}\n{amz_date}\n{credential_scope}\n{hashed_canonical_request}");

    log::debug!("StringToSign:\n{string_to_sign}");

    // 3. Signature
    let key = signing_key(scope.secret_access_key, date, scope.region, scope.service);
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

    format!(
        "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}",
        scope.access_key_id
    )
}

/// kSigning = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")
pub(crate) fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Percent-encode every path segment; `/` separators stay literal.
pub(crate) fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-encode keys and values, then sort by key (then value).
///
/// The same string is used as the request's query so what is signed is what is sent.
pub(crate) fn canonical_query(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    encoded.sort();
    encoded
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
