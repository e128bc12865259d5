//! Route53 XML documents
//!
//! Element names follow the `2013-04-01` API schema. Only the fields this crate
//! reads are modelled; unknown elements and attributes are ignored on decode.

use serde::{Deserialize, Serialize};

use crate::providers::common::strip_resource_prefix;
use crate::types::{
    ChangeInfo, ChangeRequest, ChangeStatus, HostedZone, RecordSet, RecordType,
};
use crate::utils::datetime::parse_timestamp;

use super::ROUTE53_XMLNS;

// ============ Hosted zones ============

/// `ListHostedZonesResponse` and `ListHostedZonesByNameResponse` share this shape.
#[derive(Debug, Deserialize)]
pub struct ListHostedZonesResponse {
    #[serde(rename = "HostedZones", default)]
    pub hosted_zones: HostedZoneList,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    /// `ListHostedZones` pagination cursor
    #[serde(rename = "NextMarker")]
    pub next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HostedZoneList {
    #[serde(rename = "HostedZone", default)]
    pub items: Vec<XmlHostedZone>,
}

#[derive(Debug, Deserialize)]
pub struct XmlHostedZone {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ResourceRecordSetCount")]
    pub record_count: Option<u64>,
    #[serde(rename = "Config")]
    pub config: Option<XmlHostedZoneConfig>,
}

#[derive(Debug, Deserialize)]
pub struct XmlHostedZoneConfig {
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "PrivateZone", default)]
    pub private_zone: bool,
}

impl From<XmlHostedZone> for HostedZone {
    fn from(z: XmlHostedZone) -> Self {
        let (comment, private_zone) = z
            .config
            .map(|c| (c.comment, c.private_zone))
            .unwrap_or_default();
        Self {
            id: strip_resource_prefix(&z.id, "hostedzone").to_string(),
            name: z.name,
            record_count: z.record_count,
            private_zone,
            comment,
        }
    }
}

// ============ Record sets ============

#[derive(Debug, Deserialize)]
pub struct ListResourceRecordSetsResponse {
    #[serde(rename = "ResourceRecordSets", default)]
    pub record_sets: RecordSetList,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "NextRecordName")]
    pub next_record_name: Option<String>,
    #[serde(rename = "NextRecordType")]
    pub next_record_type: Option<String>,
    #[serde(rename = "NextRecordIdentifier")]
    pub next_record_identifier: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordSetList {
    #[serde(rename = "ResourceRecordSet", default)]
    pub items: Vec<XmlRecordSet>,
}

#[derive(Debug, Deserialize)]
pub struct XmlRecordSet {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "TTL")]
    pub ttl: Option<u32>,
    #[serde(rename = "ResourceRecords")]
    pub resource_records: Option<ResourceRecordList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceRecordList {
    #[serde(rename = "ResourceRecord", default)]
    pub items: Vec<XmlResourceRecord>,
}

#[derive(Debug, Deserialize)]
pub struct XmlResourceRecord {
    #[serde(rename = "Value")]
    pub value: String,
}

impl From<XmlRecordSet> for RecordSet {
    fn from(r: XmlRecordSet) -> Self {
        Self {
            name: r.name,
            record_type: RecordType::parse(&r.record_type),
            ttl: r.ttl,
            values: r
                .resource_records
                .map(|list| list.items.into_iter().map(|rr| rr.value).collect())
                .unwrap_or_default(),
        }
    }
}

// ============ Changes ============

/// Body of `ChangeResourceRecordSetsResponse` and `GetChangeResponse`.
#[derive(Debug, Deserialize)]
pub struct ChangeInfoResponse {
    #[serde(rename = "ChangeInfo")]
    pub change_info: XmlChangeInfo,
}

#[derive(Debug, Deserialize)]
pub struct XmlChangeInfo {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "SubmittedAt")]
    pub submitted_at: Option<String>,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
}

impl XmlChangeInfo {
    /// Fails on a status this crate does not know.
    pub fn into_change_info(self) -> Result<ChangeInfo, String> {
        let status = ChangeStatus::parse(&self.status)
            .ok_or_else(|| format!("unknown change status '{}'", self.status))?;
        Ok(ChangeInfo {
            id: strip_resource_prefix(&self.id, "change").to_string(),
            status,
            submitted_at: self.submitted_at.as_deref().and_then(parse_timestamp),
            comment: self.comment,
        })
    }
}

/// `ChangeResourceRecordSetsRequest` document.
#[derive(Debug, Serialize)]
pub struct ChangeResourceRecordSetsRequest {
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    #[serde(rename = "ChangeBatch")]
    pub change_batch: XmlChangeBatch,
}

#[derive(Debug, Serialize)]
pub struct XmlChangeBatch {
    #[serde(rename = "Comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "Changes")]
    pub changes: XmlChanges,
}

#[derive(Debug, Serialize)]
pub struct XmlChanges {
    #[serde(rename = "Change")]
    pub items: Vec<XmlChange>,
}

#[derive(Debug, Serialize)]
pub struct XmlChange {
    #[serde(rename = "Action")]
    pub action: &'static str,
    #[serde(rename = "ResourceRecordSet")]
    pub record_set: XmlRecordSetBody,
}

/// Element order matters: the schema is a sequence.
#[derive(Debug, Serialize)]
pub struct XmlRecordSetBody {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(rename = "ResourceRecords")]
    pub resource_records: XmlResourceRecordsBody,
}

#[derive(Debug, Serialize)]
pub struct XmlResourceRecordsBody {
    #[serde(rename = "ResourceRecord")]
    pub items: Vec<XmlResourceRecordBody>,
}

#[derive(Debug, Serialize)]
pub struct XmlResourceRecordBody {
    #[serde(rename = "Value")]
    pub value: String,
}

impl From<&ChangeRequest> for ChangeResourceRecordSetsRequest {
    fn from(change: &ChangeRequest) -> Self {
        let record = &change.record;
        Self {
            xmlns: ROUTE53_XMLNS,
            change_batch: XmlChangeBatch {
                comment: change.comment.clone(),
                changes: XmlChanges {
                    items: vec![XmlChange {
                        action: change.action.as_str(),
                        record_set: XmlRecordSetBody {
                            name: record.name.clone(),
                            record_type: record.record_type.as_str().to_string(),
                            ttl: record.ttl,
                            resource_records: XmlResourceRecordsBody {
                                items: record
                                    .values
                                    .iter()
                                    .map(|v| XmlResourceRecordBody { value: v.clone() })
                                    .collect(),
                            },
                        },
                    }],
                },
            },
        }
    }
}

// ============ Errors ============

/// `<ErrorResponse><Error><Code/><Message/></Error></ErrorResponse>`
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: XmlError,
}

#[derive(Debug, Deserialize)]
pub struct XmlError {
    #[serde(rename = "Code")]
    pub code: Option<String>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

/// `<InvalidChangeBatch><Messages><Message/>...</Messages></InvalidChangeBatch>`
#[derive(Debug, Deserialize)]
pub struct InvalidChangeBatchResponse {
    #[serde(rename = "Messages")]
    pub messages: MessageList,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageList {
    #[serde(rename = "Message", default)]
    pub items: Vec<String>,
}
