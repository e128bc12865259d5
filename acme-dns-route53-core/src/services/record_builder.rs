//! TXT change batches for DNS-01 challenges
//!
//! Pure and deterministic. A DELETE must repeat the exact name, TTL and value of
//! the UPSERT it undoes: Route53 rejects a delete whose record set differs with
//! `InvalidChangeBatch`.

use acme_dns_route53_provider::{ChangeAction, ChangeRequest, RecordSet, RecordType};

pub const UPSERT_COMMENT: &str = "Create TXT record for Let's Encrypt DNS validation";
pub const DELETE_COMMENT: &str = "Delete TXT record for Let's Encrypt DNS validation";

/// Wrap a TXT value in literal quotes, even if it already has some.
pub fn quote_txt_value(value: &str) -> String {
    format!("\"{value}\"")
}

/// Strip exactly one leading and one trailing quote.
pub fn unquote_txt_value(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

pub fn build_upsert(name: &str, value: &str, zone_id: &str, ttl: u32) -> ChangeRequest {
    build(ChangeAction::Upsert, name, value, zone_id, ttl, UPSERT_COMMENT)
}

pub fn build_delete(name: &str, value: &str, zone_id: &str, ttl: u32) -> ChangeRequest {
    build(ChangeAction::Delete, name, value, zone_id, ttl, DELETE_COMMENT)
}

fn build(
    action: ChangeAction,
    name: &str,
    value: &str,
    zone_id: &str,
    ttl: u32,
    comment: &str,
) -> ChangeRequest {
    ChangeRequest {
        action,
        zone_id: zone_id.to_string(),
        record: RecordSet {
            name: name.to_string(),
            record_type: RecordType::Txt,
            ttl: Some(ttl),
            values: vec![quote_txt_value(value)],
        },
        comment: Some(comment.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_wraps_value_in_quotes() {
        let change = build_upsert("_acme-challenge.example.com", "abc123", "Z1", 60);
        assert_eq!(change.action, ChangeAction::Upsert);
        assert_eq!(change.zone_id, "Z1");
        assert_eq!(change.record.name, "_acme-challenge.example.com");
        assert_eq!(change.record.record_type, RecordType::Txt);
        assert_eq!(change.record.ttl, Some(60));
        assert_eq!(change.record.values, vec!["\"abc123\""]);
        assert_eq!(change.comment.as_deref(), Some(UPSERT_COMMENT));
    }

    #[test]
    fn already_quoted_value_is_wrapped_again() {
        let change = build_upsert("n", "\"abc\"", "Z1", 60);
        assert_eq!(change.record.values, vec!["\"\"abc\"\""]);
    }

    #[test]
    fn builders_are_deterministic() {
        assert_eq!(
            build_upsert("n", "v", "Z1", 60),
            build_upsert("n", "v", "Z1", 60)
        );
        assert_eq!(
            build_delete("n", "v", "Z1", 60),
            build_delete("n", "v", "Z1", 60)
        );
    }

    #[test]
    fn delete_repeats_upsert_record_exactly() {
        let upsert = build_upsert("_acme-challenge.example.com", "abc123", "Z1", 60);
        let delete = build_delete("_acme-challenge.example.com", "abc123", "Z1", 60);
        assert_eq!(delete.action, ChangeAction::Delete);
        assert_eq!(delete.record, upsert.record);
        assert_eq!(delete.zone_id, upsert.zone_id);
        assert_eq!(delete.comment.as_deref(), Some(DELETE_COMMENT));
    }

    #[test]
    fn unquote_strips_exactly_one_pair() {
        assert_eq!(unquote_txt_value("\"abc123\""), "abc123");
        assert_eq!(unquote_txt_value("\"\"abc\"\""), "\"abc\"");
        assert_eq!(unquote_txt_value("abc"), "abc");
        assert_eq!(unquote_txt_value("\""), "");
    }
}
