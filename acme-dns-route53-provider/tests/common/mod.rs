//! Shared helpers for live Route53 tests

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use acme_dns_route53_provider::{
    ChangeAction, ChangeRequest, ProviderCredentials, RecordSet, RecordType, ZoneRecordApi,
    create_provider,
};

/// Skip the test when an environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping: environment variable {} not set", $var);
                return;
            }
        )+
    };
}

/// Assert an `Option` is `Some` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Assert a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Unique record name under the test domain.
pub fn generate_test_record_name(domain: &str) -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}.{domain}", &uuid.to_string()[..8])
}

/// Single-value quoted TXT change.
pub fn txt_change(action: ChangeAction, zone_id: &str, name: &str, value: &str) -> ChangeRequest {
    ChangeRequest {
        action,
        zone_id: zone_id.to_string(),
        record: RecordSet {
            name: name.to_string(),
            record_type: RecordType::Txt,
            ttl: Some(60),
            values: vec![format!("\"{value}\"")],
        },
        comment: Some("acme-dns-route53-provider integration test".to_string()),
    }
}

/// Provider and test domain
pub struct TestContext {
    pub provider: Arc<dyn ZoneRecordApi>,
    pub domain: String,
    pub zone_id: Option<String>,
}

impl TestContext {
    /// Build from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, optional
    /// `AWS_SESSION_TOKEN`/`AWS_REGION`, and `TEST_DOMAIN`.
    pub fn route53() -> Option<Self> {
        let access_key_id = env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok()?;
        let domain = env::var("TEST_DOMAIN").ok()?;

        let credentials = ProviderCredentials::Route53 {
            access_key_id,
            secret_access_key,
            session_token: env::var("AWS_SESSION_TOKEN").ok(),
            region: env::var("AWS_REGION").ok(),
        };
        let provider = create_provider(credentials).ok()?;

        Some(Self {
            provider,
            domain,
            zone_id: None,
        })
    }

    /// Look up (and cache) the hosted zone id of the test domain.
    pub async fn find_zone_id(&mut self) -> Option<String> {
        if let Some(id) = &self.zone_id {
            return Some(id.clone());
        }
        let wanted = format!("{}.", self.domain.trim_end_matches('.'));
        let zones = self.provider.list_zones(Some(&self.domain)).await.ok()?;
        let zone = zones
            .into_iter()
            .find(|z| z.name.eq_ignore_ascii_case(&wanted))?;
        self.zone_id = Some(zone.id.clone());
        Some(zone.id)
    }
}
