//! Route53 `ZoneRecordApi` implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{strip_resource_prefix, to_fqdn};
use crate::traits::{ErrorContext, ProviderErrorMapper, ZoneRecordApi};
use crate::types::{ChangeInfo, ChangeRequest, HostedZone, RecordSet};

use super::types::{
    ChangeInfoResponse, ChangeResourceRecordSetsRequest, ListHostedZonesResponse,
    ListResourceRecordSetsResponse,
};
use super::{MAX_RECORDS_PER_PAGE, MAX_ZONES_PER_PAGE, ROUTE53_API_VERSION, Route53Provider};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

impl Route53Provider {
    /// Render a change request as the XML body of `ChangeResourceRecordSets`.
    pub(crate) fn change_batch_body(&self, change: &ChangeRequest) -> Result<String> {
        let doc = ChangeResourceRecordSetsRequest::from(change);
        let xml = quick_xml::se::to_string_with_root("ChangeResourceRecordSetsRequest", &doc)
            .map_err(|e| ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;
        Ok(format!("{XML_DECLARATION}{xml}"))
    }

    fn change_info(&self, response: ChangeInfoResponse) -> Result<ChangeInfo> {
        response
            .change_info
            .into_change_info()
            .map_err(|detail| self.parse_error(detail))
    }
}

#[async_trait]
impl ZoneRecordApi for Route53Provider {
    fn id(&self) -> &'static str {
        "route53"
    }

    async fn list_zones(&self, filter: Option<&str>) -> Result<Vec<HostedZone>> {
        if let Some(name) = filter {
            // ListHostedZonesByName: zones sorted from `dnsname` onwards, one page
            let query = vec![
                ("dnsname".to_string(), to_fqdn(name)),
                ("maxitems".to_string(), MAX_ZONES_PER_PAGE.to_string()),
            ];
            let response: ListHostedZonesResponse = self
                .get(
                    &format!("/{ROUTE53_API_VERSION}/hostedzonesbyname"),
                    &query,
                    ErrorContext::default(),
                )
                .await?;
            let zones: Vec<HostedZone> = response
                .hosted_zones
                .items
                .into_iter()
                .map(Into::into)
                .collect();
            log::debug!("[route53] {} zone(s) listed from '{name}'", zones.len());
            return Ok(zones);
        }

        let mut zones = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let mut query = vec![("maxitems".to_string(), MAX_ZONES_PER_PAGE.to_string())];
            if let Some(m) = &marker {
                query.push(("marker".to_string(), m.clone()));
            }
            let response: ListHostedZonesResponse = self
                .get(
                    &format!("/{ROUTE53_API_VERSION}/hostedzone"),
                    &query,
                    ErrorContext::default(),
                )
                .await?;
            zones.extend(response.hosted_zones.items.into_iter().map(HostedZone::from));

            match response.next_marker {
                Some(next) if response.is_truncated => marker = Some(next),
                _ => break,
            }
        }

        log::debug!("[route53] {} zone(s) listed", zones.len());
        Ok(zones)
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>> {
        let zone_id = strip_resource_prefix(zone_id, "hostedzone");
        let path = format!("/{ROUTE53_API_VERSION}/hostedzone/{zone_id}/rrset");

        let mut records = Vec::new();
        let mut cursor: Option<(String, Option<String>, Option<String>)> = None;
        loop {
            let mut query = vec![("maxitems".to_string(), MAX_RECORDS_PER_PAGE.to_string())];
            if let Some((name, record_type, identifier)) = &cursor {
                query.push(("name".to_string(), name.clone()));
                if let Some(t) = record_type {
                    query.push(("type".to_string(), t.clone()));
                }
                if let Some(i) = identifier {
                    query.push(("identifier".to_string(), i.clone()));
                }
            }

            let response: ListResourceRecordSetsResponse = self
                .get(
                    &path,
                    &query,
                    ErrorContext {
                        zone_id: Some(zone_id.to_string()),
                        ..Default::default()
                    },
                )
                .await?;
            records.extend(response.record_sets.items.into_iter().map(RecordSet::from));

            match response.next_record_name {
                Some(name) if response.is_truncated => {
                    cursor = Some((
                        name,
                        response.next_record_type,
                        response.next_record_identifier,
                    ));
                }
                _ => break,
            }
        }

        log::debug!("[route53] {} record set(s) in zone {zone_id}", records.len());
        Ok(records)
    }

    async fn submit_change(&self, change: &ChangeRequest) -> Result<ChangeInfo> {
        let zone_id = strip_resource_prefix(&change.zone_id, "hostedzone");
        let body = self.change_batch_body(change)?;

        log::info!(
            "[route53] {} {} {} in zone {zone_id}",
            change.action.as_str(),
            change.record.record_type.as_str(),
            change.record.name
        );

        let response: ChangeInfoResponse = self
            .post_xml(
                &format!("/{ROUTE53_API_VERSION}/hostedzone/{zone_id}/rrset"),
                body,
                ErrorContext {
                    zone_id: Some(zone_id.to_string()),
                    record_name: Some(change.record.name.clone()),
                    ..Default::default()
                },
            )
            .await?;

        let info = self.change_info(response)?;
        log::info!("[route53] change {} is {}", info.id, info.status.as_str());
        Ok(info)
    }

    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        let change_id = strip_resource_prefix(change_id, "change");
        let response: ChangeInfoResponse = self
            .get(
                &format!("/{ROUTE53_API_VERSION}/change/{change_id}"),
                &[],
                ErrorContext {
                    change_id: Some(change_id.to_string()),
                    ..Default::default()
                },
            )
            .await?;
        self.change_info(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangeAction, RecordType};

    #[test]
    fn change_batch_body_has_declaration_and_namespace() {
        let provider = Route53Provider::new("ak", "sk");
        assert!(provider.is_ok());
        let Ok(provider) = provider else {
            return;
        };
        let change = ChangeRequest {
            action: ChangeAction::Delete,
            zone_id: "/hostedzone/Z1".to_string(),
            record: RecordSet {
                name: "_acme-challenge.example.com".to_string(),
                record_type: RecordType::Txt,
                ttl: Some(60),
                values: vec!["\"token\"".to_string()],
            },
            comment: None,
        };

        let body = provider.change_batch_body(&change);
        assert!(body.is_ok(), "unexpected: {body:?}");
        let Ok(body) = body else {
            return;
        };
        assert!(body.starts_with(XML_DECLARATION));
        assert!(body.contains("xmlns=\"https://route53.amazonaws.com/doc/2013-04-01/\""));
        assert!(body.contains("<Action>DELETE</Action>"));
        assert!(!body.contains("<Comment>"));
    }

    #[test]
    fn provider_id() {
        let provider = Route53Provider::new("ak", "sk");
        assert!(provider.is_ok());
        let Ok(provider) = provider else {
            return;
        };
        assert_eq!(ZoneRecordApi::id(&provider), "route53");
    }
}
