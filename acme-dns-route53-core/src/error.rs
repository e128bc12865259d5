//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use acme_dns_route53_provider::ProviderError;

/// Challenge layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ChallengeError {
    /// The provider rejected the record change
    #[error("Failed to submit {action} for '{record}' in zone {zone_id}: {source}")]
    Submission {
        action: String,
        record: String,
        zone_id: String,
        source: ProviderError,
    },

    /// The zone lookup returned nothing at all
    #[error("No hosted zones exist for the given hostname: {hostname}")]
    NoZonesFound { hostname: String },

    /// Zones were returned but none is named exactly after the hostname
    #[error("No hosted zone named '{hostname}.' among the zones found: [{}]", .candidates.join(", "))]
    ZoneNotMatched {
        hostname: String,
        candidates: Vec<String>,
    },

    /// The zone lookup itself failed
    #[error("Hosted zone lookup failed for '{hostname}': {source}")]
    ZoneLookup {
        hostname: String,
        source: ProviderError,
    },

    /// Reading the change status failed while waiting for propagation
    #[error("The status of change {change_id} could not be retrieved: {source}")]
    Propagation {
        change_id: String,
        source: ProviderError,
    },

    /// The poll policy gave up before the change reached INSYNC
    #[error("Change {change_id} still pending after {attempts} status check(s) ({elapsed_secs}s)")]
    PropagationTimeout {
        change_id: String,
        attempts: u32,
        elapsed_secs: u64,
    },

    /// The caller cancelled the propagation wait
    #[error("Waiting for change {change_id} was cancelled")]
    Cancelled { change_id: String },

    /// Missing or empty input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be resolved
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl ChallengeError {
    /// Whether no zone matched the hostname.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoZonesFound { .. } | Self::ZoneNotMatched { .. })
    }

    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NoZonesFound { .. }
            | Self::ZoneNotMatched { .. }
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Cancelled { .. } => true,
            Self::Submission { source, .. }
            | Self::ZoneLookup { source, .. }
            | Self::Propagation { source, .. }
            | Self::Provider(source) => source.is_expected(),
            Self::PropagationTimeout { .. } => false,
        }
    }
}

/// Challenge layer Result type alias
pub type ChallengeResult<T> = std::result::Result<T, ChallengeError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn network_error() -> ProviderError {
        ProviderError::NetworkError {
            provider: "route53".to_string(),
            detail: "connection reset".to_string(),
        }
    }

    #[test]
    fn not_found_variants() {
        assert!(
            ChallengeError::NoZonesFound {
                hostname: "example.com".to_string()
            }
            .is_not_found()
        );
        assert!(
            ChallengeError::ZoneNotMatched {
                hostname: "example.com".to_string(),
                candidates: vec![]
            }
            .is_not_found()
        );
        assert!(!ChallengeError::InvalidArgument("x".to_string()).is_not_found());
    }

    #[test]
    fn messages_embed_hostname() {
        let err = ChallengeError::ZoneNotMatched {
            hostname: "example.com".to_string(),
            candidates: vec!["example.com.au.".to_string(), "example.community.".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No hosted zone named 'example.com.' among the zones found: [example.com.au., example.community.]"
        );

        let err = ChallengeError::Propagation {
            change_id: "C1".to_string(),
            source: network_error(),
        };
        assert_eq!(
            err.to_string(),
            "The status of change C1 could not be retrieved: [route53] Network error: connection reset"
        );
    }

    #[test]
    fn expected_follows_provider_error() {
        let err = ChallengeError::Submission {
            action: "UPSERT".to_string(),
            record: "_acme-challenge.example.com".to_string(),
            zone_id: "Z1".to_string(),
            source: ProviderError::InvalidChangeBatch {
                provider: "route53".to_string(),
                messages: vec!["not found".to_string()],
            },
        };
        assert!(err.is_expected());
        assert!(
            !ChallengeError::Propagation {
                change_id: "C1".to_string(),
                source: network_error(),
            }
            .is_expected()
        );
    }

    #[test]
    fn serializes_with_code_tag() {
        let json = serde_json::to_value(ChallengeError::Cancelled {
            change_id: "C1".to_string(),
        })
        .unwrap();
        assert_eq!(json["code"], "Cancelled");
        assert_eq!(json["details"]["change_id"], "C1");
    }
}
