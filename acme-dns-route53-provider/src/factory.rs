//! Provider factory.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::ZoneRecordApi;
use crate::types::ProviderCredentials;

use crate::providers::Route53Provider;

/// Creates a [`ZoneRecordApi`] instance from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`] variant.
/// The returned provider is wrapped in `Arc<dyn ZoneRecordApi>` for easy sharing
/// across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use acme_dns_route53_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::Route53 {
///     access_key_id: "AKIA...".to_string(),
///     secret_access_key: "secret".to_string(),
///     session_token: None,
///     region: Some("us-east-1".to_string()),
/// }).unwrap();
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Result<Arc<dyn ZoneRecordApi>> {
    match credentials {
        ProviderCredentials::Route53 {
            access_key_id,
            secret_access_key,
            session_token,
            region,
        } => {
            let mut builder = Route53Provider::builder(access_key_id, secret_access_key);
            if let Some(token) = session_token {
                builder = builder.session_token(token);
            }
            if let Some(region) = region {
                builder = builder.region(region);
            }
            Ok(Arc::new(builder.build()?))
        }
    }
}
