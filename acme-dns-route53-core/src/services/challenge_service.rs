//! DNS-01 challenge service (the surface ACME clients call)

use std::sync::Arc;

use acme_dns_route53_provider::{ChangeInfo, ZoneRecordApi, create_provider};

use crate::error::{ChallengeError, ChallengeResult};
use crate::services::propagation::PropagationWaiter;
use crate::services::record_builder::{
    build_delete, build_upsert, quote_txt_value, unquote_txt_value,
};
use crate::services::zone_resolver::ZoneResolver;
use crate::traits::EnvSource;
use crate::types::{
    ChallengeOptions, ChallengeRequest, DnsAuthorization, GetArgs, PollPolicy, ResolvedConfig,
    SetArgs,
};
use crate::utils::cancellation::Cancellation;

/// Name ACME clients know this challenge plugin by.
pub const MODULE_NAME: &str = "acme-dns-01-route53";

/// DNS-01 challenge backed by Route53.
///
/// `set` publishes `_acme-challenge` TXT records and `remove` deletes them, both
/// returning only once Route53 reports the change INSYNC. `get` reads a record
/// back for self-tests.
pub struct Route53Challenge {
    api: Arc<dyn ZoneRecordApi>,
    resolver: ZoneResolver,
    waiter: PropagationWaiter,
    default_ttl: u32,
}

impl Route53Challenge {
    /// Build on any [`ZoneRecordApi`].
    #[must_use]
    pub fn new(api: Arc<dyn ZoneRecordApi>, default_ttl: u32, policy: PollPolicy) -> Self {
        Self {
            resolver: ZoneResolver::new(api.clone()),
            waiter: PropagationWaiter::new(api.clone(), policy),
            api,
            default_ttl,
        }
    }

    /// Build the Route53 client from a resolved configuration.
    pub fn from_config(config: &ResolvedConfig) -> ChallengeResult<Self> {
        log::debug!("Creating Route53 challenge from {config:?}");
        let api = create_provider(config.credentials())?;
        Ok(Self::new(api, config.default_ttl, config.poll.clone()))
    }

    /// Resolve `options` against `env`, then build as [`Self::from_config`].
    pub fn create(options: &ChallengeOptions, env: &dyn EnvSource) -> ChallengeResult<Self> {
        Self::from_config(&options.resolve(env)?)
    }

    pub fn module(&self) -> &'static str {
        MODULE_NAME
    }

    pub fn default_ttl(&self) -> u32 {
        self.default_ttl
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        self.waiter.policy()
    }

    /// Nothing to prepare.
    #[allow(clippy::unused_async)]
    pub async fn init(&self) -> ChallengeResult<()> {
        Ok(())
    }

    /// Names of every hosted zone the credentials can see.
    pub async fn zones(&self) -> ChallengeResult<Vec<String>> {
        let zones = self.api.list_zones(None).await?;
        log::info!("Found {} hosted zone(s)", zones.len());
        Ok(zones.into_iter().map(|zone| zone.name).collect())
    }

    /// Publish the challenge TXT record and wait for it to propagate.
    pub async fn set(&self, args: &SetArgs) -> ChallengeResult<ChangeInfo> {
        self.set_with_cancellation(args, &Cancellation::never())
            .await
    }

    pub async fn set_with_cancellation(
        &self,
        args: &SetArgs,
        cancellation: &Cancellation,
    ) -> ChallengeResult<ChangeInfo> {
        let request = ChallengeRequest::from_args(args, self.default_ttl)?;
        let zone_id = self
            .resolver
            .resolve_zone(&request.domain, request.wildcard)
            .await?;

        log::info!(
            "Creating TXT record {} in zone {zone_id} (ttl {})",
            request.record_name,
            request.ttl
        );
        let change = build_upsert(
            &request.record_name,
            &request.record_value,
            &zone_id,
            request.ttl,
        );
        self.waiter.apply(&change, cancellation).await
    }

    /// Delete the challenge TXT record and wait for it to propagate.
    ///
    /// The TTL and value must equal those used by `set`; Route53 rejects any other
    /// delete with `InvalidChangeBatch`.
    pub async fn remove(&self, args: &SetArgs) -> ChallengeResult<ChangeInfo> {
        self.remove_with_cancellation(args, &Cancellation::never())
            .await
    }

    pub async fn remove_with_cancellation(
        &self,
        args: &SetArgs,
        cancellation: &Cancellation,
    ) -> ChallengeResult<ChangeInfo> {
        let request = ChallengeRequest::from_args(args, self.default_ttl)?;
        let zone_id = self
            .resolver
            .resolve_zone(&request.domain, request.wildcard)
            .await?;

        log::info!(
            "Deleting TXT record {} in zone {zone_id} (ttl {})",
            request.record_name,
            request.ttl
        );
        let change = build_delete(
            &request.record_name,
            &request.record_value,
            &zone_id,
            request.ttl,
        );
        self.waiter.apply(&change, cancellation).await
    }

    /// Read back a challenge record; `None` when no record carries the value.
    pub async fn get(&self, args: &GetArgs) -> ChallengeResult<Option<DnsAuthorization>> {
        let challenge = args.challenge.as_ref().ok_or_else(|| {
            ChallengeError::InvalidArgument("no challenge passed to get".to_string())
        })?;
        let identifier = challenge.identifier.as_ref().ok_or_else(|| {
            ChallengeError::InvalidArgument("no identifier provided to get".to_string())
        })?;

        let zone_id = self
            .resolver
            .resolve_zone(&challenge.altname, challenge.wildcard)
            .await?;
        let records = self.api.list_records(&zone_id).await?;

        let wanted_name = format!("{}.", identifier.value);
        let wanted_value = quote_txt_value(&challenge.dns_authorization);
        let found = records
            .iter()
            .filter(|record| record.name == wanted_name)
            .flat_map(|record| record.values.iter())
            .find(|value| **value == wanted_value);

        match found {
            Some(value) => Ok(Some(DnsAuthorization {
                dns_authorization: unquote_txt_value(value).to_string(),
            })),
            None => {
                log::info!(
                    "No record named {} with the expected value in the zone of {}",
                    identifier.value,
                    challenge.altname
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::test_utils::{MockZoneApi, PollStep, txt_record, zone};
    use crate::types::{
        ChallengeLookup, ChangeAction, ChangeStatus, DnsChallenge, Identifier, RecordType,
    };

    fn service(api: Arc<MockZoneApi>) -> Route53Challenge {
        Route53Challenge::new(api, 60, PollPolicy::default())
    }

    fn example_zones() -> Vec<acme_dns_route53_provider::HostedZone> {
        vec![zone("Z1", "example.com."), zone("Z2", "example.com.au.")]
    }

    fn set_args(wildcard: bool) -> SetArgs {
        SetArgs {
            domain: "example.com".to_string(),
            challenge: DnsChallenge {
                dns_host: "_acme-challenge.example.com".to_string(),
                dns_authorization: "abc123".to_string(),
                ttl: None,
                wildcard,
            },
        }
    }

    fn get_args(value: &str) -> GetArgs {
        GetArgs {
            challenge: Some(ChallengeLookup {
                identifier: Some(Identifier {
                    kind: Some("dns".to_string()),
                    value: "_acme-challenge.example.com".to_string(),
                }),
                altname: "example.com".to_string(),
                wildcard: false,
                dns_authorization: value.to_string(),
            }),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn set_upserts_and_waits_for_insync() {
        let api = MockZoneApi::with_zones(example_zones());
        api.script_polls(vec![PollStep::Pending, PollStep::InSync])
            .await;
        let svc = service(api.clone());

        let info = svc.set(&set_args(false)).await.unwrap();
        assert_eq!(info.status, ChangeStatus::InSync);

        let submitted = api.submitted().await;
        assert_eq!(submitted.len(), 1);
        let change = &submitted[0];
        assert_eq!(change.action, ChangeAction::Upsert);
        assert_eq!(change.zone_id, "Z1");
        assert_eq!(change.record.name, "_acme-challenge.example.com");
        assert_eq!(change.record.record_type, RecordType::Txt);
        assert_eq!(change.record.ttl, Some(60));
        assert_eq!(change.record.values, vec!["\"abc123\""]);
        assert_eq!(api.poll_count().await, 2);
        assert_eq!(
            api.zone_filters().await,
            vec![Some("example.com".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn remove_deletes_identical_record() {
        let api = MockZoneApi::with_zones(example_zones());
        let svc = service(api.clone());

        svc.set(&set_args(false)).await.unwrap();
        svc.remove(&set_args(false)).await.unwrap();

        let submitted = api.submitted().await;
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[1].action, ChangeAction::Delete);
        assert_eq!(submitted[1].record, submitted[0].record);
        assert_eq!(submitted[1].zone_id, submitted[0].zone_id);
    }

    #[tokio::test(start_paused = true)]
    async fn wildcard_set_uses_apex_zone() {
        let api = MockZoneApi::with_zones(example_zones());
        let svc = service(api.clone());

        let mut args = set_args(true);
        args.domain = "sub.example.com".to_string();
        svc.set(&args).await.unwrap();

        assert_eq!(
            api.zone_filters().await,
            vec![Some("example.com".to_string())]
        );
        assert_eq!(api.submitted().await[0].zone_id, "Z1");
    }

    #[tokio::test(start_paused = true)]
    async fn challenge_ttl_overrides_default() {
        let api = MockZoneApi::with_zones(example_zones());
        let svc = Route53Challenge::new(api.clone(), 120, PollPolicy::default());

        svc.set(&set_args(false)).await.unwrap();
        let mut args = set_args(false);
        args.challenge.ttl = Some(300);
        svc.set(&args).await.unwrap();

        let submitted = api.submitted().await;
        assert_eq!(submitted[0].record.ttl, Some(120));
        assert_eq!(submitted[1].record.ttl, Some(300));
    }

    #[tokio::test]
    async fn set_with_empty_value_is_invalid() {
        let api = MockZoneApi::with_zones(example_zones());
        let svc = service(api.clone());

        let mut args = set_args(false);
        args.challenge.dns_authorization = String::new();
        let err = svc.set(&args).await.unwrap_err();
        assert!(matches!(err, ChallengeError::InvalidArgument(_)));
        assert!(api.zone_filters().await.is_empty());
    }

    #[tokio::test]
    async fn set_without_zone_is_not_found() {
        let api = MockZoneApi::with_zones(vec![zone("Z9", "other.org.")]);
        let svc = service(api.clone());

        let err = svc.set(&set_args(false)).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(api.submitted().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn set_can_be_cancelled() {
        let api = MockZoneApi::with_zones(example_zones());
        api.script_polls(vec![PollStep::Pending; 5]).await;
        let svc = service(api.clone());

        let (handle, token) = Cancellation::new();
        handle.cancel();
        let err = svc
            .set_with_cancellation(&set_args(false), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ChallengeError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn get_returns_unquoted_value() {
        let api = MockZoneApi::with_zones(example_zones());
        api.set_records(vec![
            txt_record("example.com.", &["\"v=spf1 -all\""]),
            txt_record(
                "_acme-challenge.example.com.",
                &["\"other\"", "\"abc123\""],
            ),
        ])
        .await;
        let svc = service(api);

        let found = svc.get(&get_args("abc123")).await.unwrap();
        assert_eq!(
            found,
            Some(DnsAuthorization {
                dns_authorization: "abc123".to_string()
            })
        );
    }

    #[tokio::test]
    async fn get_without_records_returns_none() {
        let api = MockZoneApi::with_zones(example_zones());
        let svc = service(api);
        assert_eq!(svc.get(&get_args("abc123")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_with_different_value_returns_none() {
        let api = MockZoneApi::with_zones(example_zones());
        api.set_records(vec![txt_record(
            "_acme-challenge.example.com.",
            &["\"something-else\""],
        )])
        .await;
        let svc = service(api);
        assert_eq!(svc.get(&get_args("abc123")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_requires_fqdn_name_match() {
        let api = MockZoneApi::with_zones(example_zones());
        // name without the trailing dot never matches
        api.set_records(vec![txt_record(
            "_acme-challenge.example.com",
            &["\"abc123\""],
        )])
        .await;
        let svc = service(api);
        assert_eq!(svc.get(&get_args("abc123")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_requires_challenge_and_identifier() {
        let api = MockZoneApi::with_zones(example_zones());
        let svc = service(api.clone());

        let err = svc.get(&GetArgs { challenge: None }).await.unwrap_err();
        assert!(matches!(err, ChallengeError::InvalidArgument(_)));

        let mut args = get_args("abc123");
        if let Some(challenge) = args.challenge.as_mut() {
            challenge.identifier = None;
        }
        let err = svc.get(&args).await.unwrap_err();
        assert!(matches!(err, ChallengeError::InvalidArgument(_)));
        assert!(api.zone_filters().await.is_empty());
    }

    #[tokio::test]
    async fn zones_lists_all_names() {
        let api = MockZoneApi::with_zones(example_zones());
        let svc = service(api.clone());

        let names = svc.zones().await.unwrap();
        assert_eq!(names, vec!["example.com.", "example.com.au."]);
        assert_eq!(api.zone_filters().await, vec![None]);
    }

    #[tokio::test]
    async fn init_is_noop() {
        let api = MockZoneApi::new();
        let svc = service(api.clone());
        svc.init().await.unwrap();
        assert!(api.zone_filters().await.is_empty());
        assert_eq!(svc.module(), MODULE_NAME);
    }

    #[test]
    fn create_resolves_configuration() {
        let env: HashMap<String, String> = [
            ("AWS_ACCESS_KEY_ID", "AKIAENV"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let options = ChallengeOptions {
            ttl: Some(90),
            max_wait_secs: Some(0),
            ..Default::default()
        };

        let svc = Route53Challenge::create(&options, &env).unwrap();
        assert_eq!(svc.default_ttl(), 90);
        assert_eq!(svc.poll_policy().max_wait, None);

        let err = Route53Challenge::create(&options, &HashMap::<String, String>::new()).err();
        assert!(matches!(err, Some(ChallengeError::Config(_))));
    }
}
