//! Challenge configuration
//!
//! [`ChallengeOptions`] is what callers write down (config file, flags, code).
//! [`ChallengeOptions::resolve`] folds in the environment and defaults once,
//! producing a [`ResolvedConfig`] that the challenge service consumes without
//! ever reading ambient state itself.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use acme_dns_route53_provider::ProviderCredentials;

use crate::error::{ChallengeError, ChallengeResult};
use crate::traits::EnvSource;

/// TTL of challenge records when neither the caller nor the config sets one.
pub const DEFAULT_TTL: u32 = 60;
/// Region used when none is configured; only selects the AWS partition.
pub const DEFAULT_REGION: &str = "us-east-1";

const ENV_REGION: &str = "AWS_REGION";
const ENV_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Unresolved challenge options; every field is optional.
///
/// Accepts both `snake_case` keys and the camelCase keys ACME plugin configs use
/// (`accessKeyId`, `secretAccessKey`, ...).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeOptions {
    pub region: Option<String>,
    #[serde(alias = "accessKeyId")]
    pub access_key_id: Option<String>,
    #[serde(alias = "secretAccessKey")]
    pub secret_access_key: Option<String>,
    #[serde(alias = "sessionToken")]
    pub session_token: Option<String>,
    /// Default record TTL in seconds
    pub ttl: Option<u32>,
    /// First delay between change status checks, in seconds
    #[serde(alias = "pollInterval")]
    pub poll_interval_secs: Option<u64>,
    /// Backoff factor applied to the delay after every check
    #[serde(alias = "pollMultiplier")]
    pub poll_multiplier: Option<u32>,
    /// Upper bound of the delay between checks, in seconds
    #[serde(alias = "maxPollInterval")]
    pub max_poll_interval_secs: Option<u64>,
    /// Give up waiting after this many seconds; `0` waits forever
    #[serde(alias = "maxWait")]
    pub max_wait_secs: Option<u64>,
    /// Give up after this many status checks
    #[serde(alias = "maxAttempts")]
    pub max_attempts: Option<u32>,
    /// Consecutive failed status checks tolerated before the wait fails
    #[serde(alias = "pollErrorRetries")]
    pub poll_error_retries: Option<u32>,
}

impl fmt::Debug for ChallengeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChallengeOptions")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("ttl", &self.ttl)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("poll_multiplier", &self.poll_multiplier)
            .field("max_poll_interval_secs", &self.max_poll_interval_secs)
            .field("max_wait_secs", &self.max_wait_secs)
            .field("max_attempts", &self.max_attempts)
            .field("poll_error_retries", &self.poll_error_retries)
            .finish()
    }
}

impl ChallengeOptions {
    /// Field-wise merge: values set on `self` win over `fallback`.
    #[must_use]
    pub fn merge(self, fallback: Self) -> Self {
        Self {
            region: self.region.or(fallback.region),
            access_key_id: self.access_key_id.or(fallback.access_key_id),
            secret_access_key: self.secret_access_key.or(fallback.secret_access_key),
            session_token: self.session_token.or(fallback.session_token),
            ttl: self.ttl.or(fallback.ttl),
            poll_interval_secs: self.poll_interval_secs.or(fallback.poll_interval_secs),
            poll_multiplier: self.poll_multiplier.or(fallback.poll_multiplier),
            max_poll_interval_secs: self
                .max_poll_interval_secs
                .or(fallback.max_poll_interval_secs),
            max_wait_secs: self.max_wait_secs.or(fallback.max_wait_secs),
            max_attempts: self.max_attempts.or(fallback.max_attempts),
            poll_error_retries: self.poll_error_retries.or(fallback.poll_error_retries),
        }
    }

    /// Resolve explicit values, then the environment, then defaults.
    ///
    /// A session token is only taken from the environment when the access key is
    /// too, so explicit keys are never paired with an unrelated ambient token.
    pub fn resolve(&self, env: &dyn EnvSource) -> ChallengeResult<ResolvedConfig> {
        self.check_poll_values()?;

        let region = match non_empty(self.region.as_deref())
            .or_else(|| env.var(ENV_REGION))
            .or_else(|| env.var(ENV_DEFAULT_REGION))
        {
            Some(region) => region,
            None => {
                log::warn!("No AWS region configured, defaulting to {DEFAULT_REGION}");
                DEFAULT_REGION.to_string()
            }
        };

        let explicit_key = non_empty(self.access_key_id.as_deref());
        let key_from_env = explicit_key.is_none();
        let access_key_id = explicit_key
            .or_else(|| env.var(ENV_ACCESS_KEY_ID))
            .ok_or_else(|| {
                ChallengeError::Config(format!(
                    "missing AWS access key id (set access_key_id or {ENV_ACCESS_KEY_ID})"
                ))
            })?;
        let secret_access_key = non_empty(self.secret_access_key.as_deref())
            .or_else(|| env.var(ENV_SECRET_ACCESS_KEY))
            .ok_or_else(|| {
                ChallengeError::Config(format!(
                    "missing AWS secret access key (set secret_access_key or {ENV_SECRET_ACCESS_KEY})"
                ))
            })?;
        let session_token = non_empty(self.session_token.as_deref()).or_else(|| {
            if key_from_env {
                env.var(ENV_SESSION_TOKEN)
            } else {
                None
            }
        });

        Ok(ResolvedConfig {
            region,
            access_key_id,
            secret_access_key,
            session_token,
            default_ttl: self.ttl.unwrap_or(DEFAULT_TTL),
            poll: self.poll_policy(),
        })
    }

    /// A zero delay or multiplier would poll the change status back to back.
    fn check_poll_values(&self) -> ChallengeResult<()> {
        let zero = [
            ("poll_interval_secs", self.poll_interval_secs == Some(0)),
            ("poll_multiplier", self.poll_multiplier == Some(0)),
            ("max_poll_interval_secs", self.max_poll_interval_secs == Some(0)),
        ];
        match zero.iter().find(|(_, is_zero)| *is_zero) {
            Some((name, _)) => Err(ChallengeError::Config(format!(
                "{name} must be at least 1"
            ))),
            None => Ok(()),
        }
    }

    /// Poll policy with every configured field applied over the defaults.
    pub fn poll_policy(&self) -> PollPolicy {
        let defaults = PollPolicy::default();
        PollPolicy {
            interval: self
                .poll_interval_secs
                .map_or(defaults.interval, Duration::from_secs),
            multiplier: self.poll_multiplier.unwrap_or(defaults.multiplier),
            max_interval: self
                .max_poll_interval_secs
                .map_or(defaults.max_interval, Duration::from_secs),
            max_wait: match self.max_wait_secs {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.max_wait,
            },
            max_attempts: self.max_attempts.or(defaults.max_attempts),
            poll_error_retries: self
                .poll_error_retries
                .unwrap_or(defaults.poll_error_retries),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Fully resolved configuration handed to the challenge service.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub default_ttl: u32,
    pub poll: PollPolicy,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("default_ttl", &self.default_ttl)
            .field("poll", &self.poll)
            .finish()
    }
}

impl ResolvedConfig {
    /// Credentials for [`acme_dns_route53_provider::create_provider`].
    pub fn credentials(&self) -> ProviderCredentials {
        ProviderCredentials::Route53 {
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            session_token: self.session_token.clone(),
            region: Some(self.region.clone()),
        }
    }
}

/// How the propagation waiter polls a submitted change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay after the first status check
    pub interval: Duration,
    /// Factor the delay grows by after each check
    pub multiplier: u32,
    /// Cap on the delay between checks
    pub max_interval: Duration,
    /// Total wait after which the change is reported as timed out
    pub max_wait: Option<Duration>,
    /// Maximum number of status checks
    pub max_attempts: Option<u32>,
    /// Consecutive failed checks tolerated; `0` makes the first failure fatal
    pub poll_error_retries: u32,
}

impl Default for PollPolicy {
    /// 5s doubling up to 30s, for at most 15 minutes.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            multiplier: 2,
            max_interval: Duration::from_secs(30),
            max_wait: Some(Duration::from_secs(15 * 60)),
            max_attempts: None,
            poll_error_retries: 0,
        }
    }
}

impl PollPolicy {
    /// Fixed 5s delay with no attempt or time bound.
    pub fn unbounded() -> Self {
        Self {
            interval: Duration::from_secs(5),
            multiplier: 1,
            max_interval: Duration::from_secs(5),
            max_wait: None,
            max_attempts: None,
            poll_error_retries: 0,
        }
    }

    /// Delay after the status check numbered `check` (0-based).
    pub fn delay(&self, check: u32) -> Duration {
        self.multiplier
            .checked_pow(check)
            .and_then(|factor| self.interval.checked_mul(factor))
            .map_or(self.max_interval, |delay| delay.min(self.max_interval))
    }
}
