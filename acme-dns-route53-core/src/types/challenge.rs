//! Arguments exchanged with the ACME client
//!
//! Field names follow the JSON shape ACME client libraries pass to DNS-01
//! challenge plugins (`dnsHost`, `dnsAuthorization`, ...).

use serde::{Deserialize, Serialize};

use crate::error::{ChallengeError, ChallengeResult};

/// Arguments of `set` and `remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetArgs {
    /// Domain the certificate is issued for (used to find the zone)
    pub domain: String,
    pub challenge: DnsChallenge,
}

/// Challenge block of [`SetArgs`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsChallenge {
    /// Fully qualified record name, e.g. `_acme-challenge.example.com`
    pub dns_host: String,
    /// Record value, unquoted
    pub dns_authorization: String,
    /// Record TTL; the configured default applies when absent
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub wildcard: bool,
}

/// Arguments of `get`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetArgs {
    #[serde(default)]
    pub challenge: Option<ChallengeLookup>,
}

/// Challenge block of [`GetArgs`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeLookup {
    /// Identifier whose `value` is the record name (without trailing dot)
    #[serde(default)]
    pub identifier: Option<Identifier>,
    /// Name the zone is resolved from
    pub altname: String,
    #[serde(default)]
    pub wildcard: bool,
    /// Expected record value, unquoted
    pub dns_authorization: String,
}

/// ACME identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    /// Identifier type, normally `dns`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub value: String,
}

/// Result of a successful `get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsAuthorization {
    pub dns_authorization: String,
}

/// One `set`/`remove` invocation, validated and with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    pub domain: String,
    pub wildcard: bool,
    pub record_name: String,
    pub record_value: String,
    pub ttl: u32,
}

impl ChallengeRequest {
    /// Validate ACME arguments; `default_ttl` applies when the challenge has none.
    pub fn from_args(args: &SetArgs, default_ttl: u32) -> ChallengeResult<Self> {
        let challenge = &args.challenge;
        if args.domain.trim().is_empty() {
            return Err(ChallengeError::InvalidArgument(
                "domain must not be empty".to_string(),
            ));
        }
        if challenge.dns_host.trim().is_empty() {
            return Err(ChallengeError::InvalidArgument(
                "challenge.dnsHost must not be empty".to_string(),
            ));
        }
        if challenge.dns_authorization.is_empty() {
            return Err(ChallengeError::InvalidArgument(
                "challenge.dnsAuthorization must not be empty".to_string(),
            ));
        }

        Ok(Self {
            domain: args.domain.clone(),
            wildcard: challenge.wildcard,
            record_name: challenge.dns_host.clone(),
            record_value: challenge.dns_authorization.clone(),
            ttl: challenge.ttl.unwrap_or(default_ttl),
        })
    }
}
