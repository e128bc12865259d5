//! Route53 signed HTTP requests

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::datetime::amz_date;
use crate::utils::log_sanitizer::truncate_for_log;

use super::Route53Provider;
use super::sign::canonical_query;
use super::types::{ErrorResponse, InvalidChangeBatchResponse};

impl Route53Provider {
    // ==================== Helpers ====================

    /// Turn a non-2xx response into a [`ProviderError`].
    pub(crate) fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        ctx: ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        if let Ok(error) = quick_xml::de::from_str::<ErrorResponse>(response_text) {
            return Err(self.map_error(
                RawApiError::with_code(
                    error.error.code.unwrap_or_default(),
                    error.error.message.unwrap_or_default(),
                ),
                ctx,
            ));
        }

        if let Ok(batch) = quick_xml::de::from_str::<InvalidChangeBatchResponse>(response_text) {
            return Err(self.map_error(
                RawApiError::with_messages("InvalidChangeBatch", batch.messages.items),
                ctx,
            ));
        }

        Err(self.unknown_error(RawApiError::new(format!(
            "HTTP {status}: {}",
            truncate_for_log(response_text)
        ))))
    }

    /// Sign and send one request; returns the raw body of a 2xx response.
    async fn send_signed(
        &self,
        method: &str,
        path: &str,
        query: &[(String, String)],
        body: Option<String>,
        ctx: ErrorContext,
    ) -> Result<String> {
        let host = self.endpoint.host.as_str();
        let timestamp = amz_date(Utc::now());
        let payload = body.unwrap_or_default();

        let mut headers = vec![
            ("Host".to_string(), host.to_string()),
            ("X-Amz-Date".to_string(), timestamp.clone()),
        ];
        if !payload.is_empty() {
            headers.push(("Content-Type".to_string(), "application/xml".to_string()));
        }
        if let Some(token) = &self.session_token {
            headers.push(("X-Amz-Security-Token".to_string(), token.clone()));
        }

        let authorization = self.sign(method, path, query, &headers, &payload, &timestamp);

        let query_string = canonical_query(query);
        let url = if query_string.is_empty() {
            format!("https://{host}{path}")
        } else {
            format!("https://{host}{path}?{query_string}")
        };

        let request_builder = match method {
            "GET" => self.client.get(&url),
            "POST" => self.client.post(&url),
            other => {
                return Err(ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: "method".to_string(),
                    detail: format!("unsupported HTTP method {other}"),
                });
            }
        };

        let mut request = request_builder.header("Authorization", authorization);
        for (name, value) in &headers {
            // reqwest derives Host from the URL
            if name != "Host" {
                request = request.header(name.as_str(), value.as_str());
            }
        }
        if !payload.is_empty() {
            log::debug!("[route53] Request Body: {}", truncate_for_log(&payload));
            request = request.body(payload);
        }

        let (_, response_text) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            method,
            &url,
            self.max_retries,
            |status, text| self.handle_response_error(status, text, ctx.clone()),
        )
        .await?;

        Ok(response_text)
    }

    // ==================== Request methods ====================

    /// Signed GET, decoding the XML response into `T`.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        ctx: ErrorContext,
    ) -> Result<T> {
        let text = self.send_signed("GET", path, query, None, ctx).await?;
        HttpUtils::parse_xml(&text, self.provider_name())
    }

    /// Signed POST of an XML document, decoding the XML response into `T`.
    pub(crate) async fn post_xml<T: DeserializeOwned>(
        &self,
        path: &str,
        body: String,
        ctx: ErrorContext,
    ) -> Result<T> {
        let text = self.send_signed("POST", path, &[], Some(body), ctx).await?;
        HttpUtils::parse_xml(&text, self.provider_name())
    }
}
