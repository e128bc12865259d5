use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{ChangeInfo, ChangeRequest, HostedZone, RecordSet};

/// Raw API error (internal)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code (`NoSuchHostedZone`, `InvalidChangeBatch`, ...)
    pub code: Option<String>,
    /// Every message the API returned, in document order
    pub messages: Vec<String>,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            messages: vec![message.into()],
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            messages: vec![message.into()],
        }
    }

    pub fn with_messages(code: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            code: Some(code.into()),
            messages,
        }
    }

    /// All messages joined for single-line display.
    pub fn message(&self) -> String {
        self.messages.join("; ")
    }
}

/// Extra context used while mapping errors (internal)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Zone id the request addressed
    pub zone_id: Option<String>,
    /// Change id the request addressed
    pub change_id: Option<String>,
    /// Record name carried in a change batch
    pub record_name: Option<String>,
}

/// Maps raw API errors onto [`ProviderError`] (internal)
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_message: raw.message(),
            raw_code: raw.code,
        }
    }
}

/// Zone and record-set operations a DNS-01 challenge needs from a DNS backend.
///
/// Implementations must be cheap to share: one instance is held behind an `Arc`
/// and reused for every challenge.
#[async_trait]
pub trait ZoneRecordApi: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// List hosted zones.
    ///
    /// With a filter the backend returns zones ordered from the given name onwards;
    /// this is **not** an exact-match filter and callers must compare names themselves.
    /// Without a filter every zone visible to the credentials is returned.
    async fn list_zones(&self, filter: Option<&str>) -> Result<Vec<HostedZone>>;

    /// List every record set in a zone.
    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>>;

    /// Submit a change batch; returns the change as initially reported.
    async fn submit_change(&self, change: &ChangeRequest) -> Result<ChangeInfo>;

    /// Fetch the current state of a previously submitted change.
    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo>;
}
