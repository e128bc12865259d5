//! Helpers shared by provider implementations

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;

use crate::error::{ProviderError, Result};

type HmacSha256 = Hmac<Sha256>;

// ============ HTTP Client ============

/// Connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build the HTTP client with connect and request timeouts.
pub fn create_http_client(provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ HMAC-SHA256 ============

/// HMAC-SHA256 over `data` keyed with `key`.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

// ============ Names and ids ============

/// Fully qualify a domain name with exactly one trailing dot.
pub fn to_fqdn(name: &str) -> String {
    format!("{}.", name.trim_end_matches('.'))
}

/// Strip a resource prefix such as `/hostedzone/` or `/change/` from an id.
///
/// Ids already in bare form are returned unchanged.
pub fn strip_resource_prefix<'a>(id: &'a str, resource: &str) -> &'a str {
    id.trim_start_matches('/')
        .strip_prefix(resource)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or_else(|| id.trim_start_matches('/'))
}
