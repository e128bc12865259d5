//! DNS backend implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod route53;

pub use route53::{Route53Endpoint, Route53Provider, Route53ProviderBuilder};
