//! Route53 error mapping
//!
//! Reference: <https://docs.aws.amazon.com/Route53/latest/APIReference/CommonErrors.html>
//!
//! ## Mapped codes
//!
//! - **Authentication**: `InvalidClientTokenId`, `SignatureDoesNotMatch`, `IncompleteSignature`,
//!   `MissingAuthenticationToken`, `ExpiredToken`, `InvalidSignatureException`
//! - **Authorization**: `AccessDenied`, `AccessDeniedException`, `NotAuthorizedException`
//! - **Throttling**: `Throttling`, `ThrottlingException`, `RequestLimitExceeded`,
//!   `PriorRequestNotComplete` (another change to the same zone is still being applied)
//! - **Resources**: `NoSuchHostedZone`, `NoSuchChange`
//! - **Change batch**: `InvalidChangeBatch` (also delivered as its own `<InvalidChangeBatch>` document)
//! - **Input**: `InvalidInput`, `InvalidDomainName`, `InvalidArgument`, `InvalidPaginationToken`
//!
//! Everything else (health checks, traffic policies, DNSSEC, ...) falls back to `Unknown`.

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Route53Provider;

impl ProviderErrorMapper for Route53Provider {
    fn provider_name(&self) -> &'static str {
        "route53"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        map_route53_error(self.provider_name(), raw, context)
    }
}

pub(crate) fn map_route53_error(
    provider: &str,
    raw: RawApiError,
    context: ErrorContext,
) -> ProviderError {
    let provider = provider.to_string();
    match raw.code.as_deref() {
        // ============ Authentication ============
        Some(
            "InvalidClientTokenId"
            | "SignatureDoesNotMatch"
            | "IncompleteSignature"
            | "MissingAuthenticationToken"
            | "ExpiredToken"
            | "InvalidSignatureException"
            | "UnrecognizedClientException",
        ) => ProviderError::InvalidCredentials {
            provider,
            raw_message: Some(raw.message()),
        },

        // ============ Authorization ============
        Some("AccessDenied" | "AccessDeniedException" | "NotAuthorizedException") => {
            ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message()),
            }
        }

        // ============ Throttling / conflicting change in flight ============
        Some(
            "Throttling"
            | "ThrottlingException"
            | "RequestLimitExceeded"
            | "PriorRequestNotComplete",
        ) => ProviderError::RateLimited {
            provider,
            retry_after: None,
            raw_message: Some(raw.message()),
        },

        // ============ Missing resources ============
        Some("NoSuchHostedZone") => ProviderError::ZoneNotFound {
            provider,
            zone: context.zone_id.unwrap_or_default(),
            raw_message: Some(raw.message()),
        },
        Some("NoSuchChange") => ProviderError::ChangeNotFound {
            provider,
            change_id: context.change_id.unwrap_or_default(),
            raw_message: Some(raw.message()),
        },

        // ============ Change batch rejected ============
        Some("InvalidChangeBatch") => ProviderError::InvalidChangeBatch {
            provider,
            messages: raw.messages,
        },

        // ============ Invalid input ============
        Some("InvalidDomainName") => ProviderError::InvalidParameter {
            provider,
            param: "name".to_string(),
            detail: raw.message(),
        },
        Some("InvalidInput" | "InvalidArgument" | "InvalidPaginationToken") => {
            ProviderError::InvalidParameter {
                provider,
                param: context
                    .record_name
                    .map_or_else(|| "request".to_string(), |name| format!("record '{name}'")),
                detail: raw.message(),
            }
        }

        // ============ Fallback ============
        _ => ProviderError::Unknown {
            provider,
            raw_message: raw.message(),
            raw_code: raw.code,
        },
    }
}
