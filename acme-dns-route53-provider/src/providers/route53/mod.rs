//! AWS Route53 provider

mod error;
mod http;
mod provider;
mod sign;
/// Route53 XML request/response documents.
pub(crate) mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::utils::log_sanitizer::mask_key;

/// API version path prefix.
pub(crate) const ROUTE53_API_VERSION: &str = "2013-04-01";
/// Service name used in the SigV4 credential scope.
pub(crate) const ROUTE53_SERVICE: &str = "route53";
/// XML namespace of request documents.
pub(crate) const ROUTE53_XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";
/// Page size for `ListHostedZones` / `ListHostedZonesByName` (API maximum).
pub(crate) const MAX_ZONES_PER_PAGE: u32 = 100;
/// Page size for `ListResourceRecordSets` (API maximum).
pub(crate) const MAX_RECORDS_PER_PAGE: u32 = 300;

/// Host and signing region of the Route53 control plane for one AWS partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route53Endpoint {
    /// API host name, without scheme.
    pub host: String,
    /// Region the SigV4 credential scope must name.
    pub signing_region: String,
}

impl Route53Endpoint {
    /// Route53 is a global service: every region of a partition shares one endpoint.
    pub fn for_region(region: Option<&str>) -> Self {
        let region = region.unwrap_or_default();
        let (host, signing_region) = if region.starts_with("cn-") {
            ("route53.amazonaws.com.cn", "cn-northwest-1")
        } else if region.starts_with("us-gov-") {
            ("route53.us-gov.amazonaws.com", "us-gov-west-1")
        } else {
            ("route53.amazonaws.com", "us-east-1")
        };
        Self {
            host: host.to_string(),
            signing_region: signing_region.to_string(),
        }
    }
}

/// AWS Route53 provider.
///
/// Authenticates with AWS Signature Version 4.
///
/// # Construction
///
/// ```rust,no_run
/// use acme_dns_route53_provider::Route53Provider;
///
/// let provider = Route53Provider::builder("AKIA...", "secret")
///     .region("eu-west-1")
///     .build()
///     .unwrap();
/// ```
pub struct Route53Provider {
    pub(crate) client: Client,
    pub(crate) access_key_id: String,
    pub(crate) secret_access_key: String,
    pub(crate) session_token: Option<String>,
    pub(crate) endpoint: Route53Endpoint,
    pub(crate) max_retries: u32,
}

/// Builder for [`Route53Provider`].
pub struct Route53ProviderBuilder {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    region: Option<String>,
    max_retries: u32,
}

impl Route53ProviderBuilder {
    fn new(access_key_id: String, secret_access_key: String) -> Self {
        Self {
            access_key_id,
            secret_access_key,
            session_token: None,
            region: None,
            max_retries: 2,
        }
    }

    /// STS session token for temporary credentials.
    pub fn session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Region used to select the partition endpoint (default: the `aws` partition).
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the maximum number of automatic retries for transient errors (default: 2).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the [`Route53Provider`] instance.
    pub fn build(self) -> Result<Route53Provider> {
        let endpoint = Route53Endpoint::for_region(self.region.as_deref());
        log::debug!(
            "[route53] endpoint {} (signing region {}), access key {}",
            endpoint.host,
            endpoint.signing_region,
            mask_key(&self.access_key_id)
        );
        Ok(Route53Provider {
            client: create_http_client(ROUTE53_SERVICE)?,
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            session_token: self.session_token,
            endpoint,
            max_retries: self.max_retries,
        })
    }
}

impl Route53Provider {
    /// Creates a provider for the default `aws` partition with default settings.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(access_key_id, secret_access_key).build()
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Route53ProviderBuilder {
        Route53ProviderBuilder::new(access_key_id.into(), secret_access_key.into())
    }

    /// Endpoint this provider talks to.
    pub fn endpoint(&self) -> &Route53Endpoint {
        &self.endpoint
    }
}
