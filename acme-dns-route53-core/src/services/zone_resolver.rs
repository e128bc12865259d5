//! Hosted zone resolution

use std::sync::Arc;

use acme_dns_route53_provider::ZoneRecordApi;

use crate::error::{ChallengeError, ChallengeResult};

/// Name the zone lookup uses for `hostname`.
///
/// Wildcard requests are reduced to their last two labels. This is a naive apex
/// approximation and is wrong for multi-label public suffixes such as `co.uk`.
pub fn lookup_name(hostname: &str, wildcard: bool) -> String {
    let hostname = hostname.trim_end_matches('.');
    if !wildcard {
        return hostname.to_string();
    }

    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() <= 2 {
        return hostname.to_string();
    }
    let apex = labels[labels.len() - 2..].join(".");
    log::info!(
        "Received a wildcard name, resolving the zone of the top level domain {apex} instead of {hostname}"
    );
    apex
}

/// Maps a domain name to the id of the hosted zone that serves it.
pub struct ZoneResolver {
    api: Arc<dyn ZoneRecordApi>,
}

impl ZoneResolver {
    #[must_use]
    pub fn new(api: Arc<dyn ZoneRecordApi>) -> Self {
        Self { api }
    }

    /// Resolve the zone id for `hostname`; the provider is queried on every call.
    pub async fn resolve_zone(&self, hostname: &str, wildcard: bool) -> ChallengeResult<String> {
        let hostname = lookup_name(hostname, wildcard);
        let wanted = format!("{hostname}.");

        let zones = self
            .api
            .list_zones(Some(&hostname))
            .await
            .map_err(|source| ChallengeError::ZoneLookup {
                hostname: hostname.clone(),
                source,
            })?;

        if zones.is_empty() {
            return Err(ChallengeError::NoZonesFound { hostname });
        }

        // the lookup is ordered from `hostname` onwards, not an exact filter
        let exact: Vec<_> = zones
            .iter()
            .filter(|zone| zone.name.eq_ignore_ascii_case(&wanted))
            .collect();
        // ACME validators only see the public zone of a split-horizon pair
        match exact
            .iter()
            .find(|zone| !zone.private_zone)
            .or_else(|| exact.first())
        {
            Some(zone) => {
                log::debug!("Resolved {hostname} to hosted zone {}", zone.id);
                Ok(zone.id.clone())
            }
            None => Err(ChallengeError::ZoneNotMatched {
                hostname,
                candidates: zones.into_iter().map(|zone| zone.name).collect(),
            }),
        }
    }
}
