//! Provider-neutral zone, record set and change types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Zones ============

/// A hosted zone visible to the configured credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedZone {
    /// Bare zone id (`Z1D633PJN98FT9`), without the `/hostedzone/` prefix.
    pub id: String,
    /// Fully qualified zone name with trailing dot (`example.com.`).
    pub name: String,
    /// Number of record sets in the zone, if reported.
    pub record_count: Option<u64>,
    /// Whether this is a private (VPC-bound) zone.
    pub private_zone: bool,
    /// Free-form comment attached to the zone.
    pub comment: Option<String>,
}

// ============ Record sets ============

/// DNS record type as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Soa,
    Srv,
    Caa,
    /// Any type not modelled above (`PTR`, `SPF`, `NAPTR`, `DS`, ...).
    Other(String),
}

impl RecordType {
    /// Uppercase wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Soa => "SOA",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Other(s) => s,
        }
    }

    /// Parse a wire type, case-insensitively.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "MX" => Self::Mx,
            "TXT" => Self::Txt,
            "NS" => Self::Ns,
            "SOA" => Self::Soa,
            "SRV" => Self::Srv,
            "CAA" => Self::Caa,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        t.as_str().to_string()
    }
}

/// A resource record set: every value sharing one name and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    /// Fully qualified owner name. Listed record sets carry a trailing dot.
    pub name: String,
    pub record_type: RecordType,
    /// Absent for alias record sets.
    pub ttl: Option<u32>,
    /// Raw record values exactly as stored by the provider (TXT values keep their quotes).
    pub values: Vec<String>,
}

// ============ Changes ============

/// Mutation applied to a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Upsert,
    Delete,
}

impl ChangeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upsert => "UPSERT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-record change batch addressed to one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub action: ChangeAction,
    /// Bare zone id the change is submitted to.
    pub zone_id: String,
    pub record: RecordSet,
    /// Batch comment shown in the provider console.
    pub comment: Option<String>,
}

/// Propagation state of a submitted change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeStatus {
    /// Accepted but not yet applied on every authoritative name server.
    #[serde(rename = "PENDING")]
    Pending,
    /// Applied everywhere.
    #[serde(rename = "INSYNC")]
    InSync,
}

impl ChangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InSync => "INSYNC",
        }
    }

    /// Parse the wire status. Returns `None` for anything unrecognised.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "INSYNC" => Some(Self::InSync),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the provider reports about a submitted change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    /// Bare change id, without the `/change/` prefix.
    pub id: String,
    pub status: ChangeStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
}

// ============ Credentials ============

/// Credentials accepted by [`create_provider`](crate::create_provider).
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "camelCase")]
pub enum ProviderCredentials {
    /// AWS access key pair, optionally with an STS session token.
    #[serde(rename_all = "camelCase")]
    Route53 {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
        /// Region used to pick the partition endpoint; Route53 itself is global.
        region: Option<String>,
    },
}

// Secrets never reach Debug output.
impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route53 {
                access_key_id,
                session_token,
                region,
                ..
            } => f
                .debug_struct("Route53")
                .field("access_key_id", access_key_id)
                .field("secret_access_key", &"<redacted>")
                .field("session_token", &session_token.as_ref().map(|_| "<redacted>"))
                .field("region", region)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_parse_is_case_insensitive() {
        assert_eq!(RecordType::parse("txt"), RecordType::Txt);
        assert_eq!(RecordType::parse("AAAA"), RecordType::Aaaa);
        assert_eq!(
            RecordType::parse("naptr"),
            RecordType::Other("NAPTR".to_string())
        );
    }

    #[test]
    fn record_type_serializes_as_wire_string() {
        let json = serde_json::to_string(&RecordType::Txt).unwrap();
        assert_eq!(json, "\"TXT\"");
        let back: RecordType = serde_json::from_str("\"PTR\"").unwrap();
        assert_eq!(back, RecordType::Other("PTR".to_string()));
    }

    #[test]
    fn change_status_parse() {
        assert_eq!(ChangeStatus::parse("PENDING"), Some(ChangeStatus::Pending));
        assert_eq!(ChangeStatus::parse("INSYNC"), Some(ChangeStatus::InSync));
        assert_eq!(ChangeStatus::parse("insync"), None);
    }

    #[test]
    fn change_action_wire_names() {
        assert_eq!(ChangeAction::Upsert.as_str(), "UPSERT");
        assert_eq!(ChangeAction::Delete.to_string(), "DELETE");
        assert_eq!(
            serde_json::to_string(&ChangeAction::Upsert).unwrap(),
            "\"UPSERT\""
        );
    }

    #[test]
    fn credentials_debug_redacts_secrets() {
        let creds = ProviderCredentials::Route53 {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "super-secret".to_string(),
            session_token: Some("token".to_string()),
            region: None,
        };
        let out = format!("{creds:?}");
        assert!(out.contains("AKIDEXAMPLE"));
        assert!(!out.contains("super-secret"));
        assert!(!out.contains("\"token\""));
    }
}
