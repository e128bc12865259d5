//! # acme-dns-route53-provider
//!
//! A small AWS Route53 client covering exactly what a DNS-01 ACME challenge needs:
//! hosted zone discovery, record-set listing, change submission and change status.
//!
//! Requests are signed with AWS Signature Version 4 and spoken over the Route53
//! REST/XML API (`2013-04-01`).
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation and static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acme_dns_route53_provider::{
//!     create_provider, ChangeAction, ChangeRequest, ProviderCredentials, RecordSet, RecordType,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(ProviderCredentials::Route53 {
//!         access_key_id: "AKIA...".to_string(),
//!         secret_access_key: "secret".to_string(),
//!         session_token: None,
//!         region: None,
//!     })?;
//!
//!     let zones = provider.list_zones(Some("example.com")).await?;
//!     let zone = &zones[0];
//!
//!     let change = provider
//!         .submit_change(&ChangeRequest {
//!             action: ChangeAction::Upsert,
//!             zone_id: zone.id.clone(),
//!             record: RecordSet {
//!                 name: "_acme-challenge.example.com".to_string(),
//!                 record_type: RecordType::Txt,
//!                 ttl: Some(60),
//!                 values: vec!["\"token\"".to_string()],
//!             },
//!             comment: None,
//!         })
//!         .await?;
//!     println!("{} {:?}", change.id, change.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError).
//!
//! - [`ProviderError::InvalidCredentials`] — signature or key rejected
//! - [`ProviderError::InvalidChangeBatch`] — change batch rejected as a whole
//! - [`ProviderError::RateLimited`] — throttled, or a prior change still in flight (retryable)
//! - [`ProviderError::NetworkError`] — network connectivity issue (retryable)
//!
//! Transport failures are retried with exponential backoff.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory function
pub use factory::create_provider;

// Re-export the public trait only (internal traits are not exported)
pub use traits::ZoneRecordApi;

// Re-export types
pub use types::{
    ChangeAction, ChangeInfo, ChangeRequest, ChangeStatus, HostedZone, ProviderCredentials,
    RecordSet, RecordType,
};

// Re-export utils
pub use utils::{datetime, log_sanitizer};

// Re-export the concrete provider
pub use providers::{Route53Endpoint, Route53Provider, Route53ProviderBuilder};
