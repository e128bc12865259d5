//! Command line arguments

use std::path::PathBuf;

use acme_dns_route53_core::types::{
    ChallengeLookup, ChallengeOptions, DnsChallenge, GetArgs, Identifier, SetArgs,
};
use clap::{Args, Parser, Subcommand};

const CHALLENGE_LABEL: &str = "_acme-challenge";

/// Publish and clean up ACME DNS-01 challenge records in AWS Route53
#[derive(Parser, Debug)]
#[command(name = "acme-dns-route53", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (defaults to the user config directory)
    #[arg(short, long, global = true, env = "ACME_DNS_ROUTE53_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: OptionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override the config file and the environment.
#[derive(Args, Debug, Default)]
pub struct OptionArgs {
    /// AWS region; only selects the partition (aws, aws-cn, aws-us-gov)
    #[arg(long, global = true)]
    pub region: Option<String>,

    #[arg(long, global = true)]
    pub access_key_id: Option<String>,

    #[arg(long, global = true)]
    pub secret_access_key: Option<String>,

    #[arg(long, global = true)]
    pub session_token: Option<String>,

    /// TTL of challenge records, in seconds
    #[arg(long, global = true)]
    pub ttl: Option<u32>,

    /// First delay between change status checks, in seconds (at least 1)
    #[arg(long, global = true)]
    pub poll_interval: Option<u64>,

    /// Give up waiting for propagation after this many seconds (0 waits forever)
    #[arg(long, global = true)]
    pub max_wait: Option<u64>,

    /// Failed status checks tolerated before the wait fails
    #[arg(long, global = true)]
    pub poll_error_retries: Option<u32>,
}

impl OptionArgs {
    pub fn to_options(&self) -> ChallengeOptions {
        ChallengeOptions {
            region: self.region.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            session_token: self.session_token.clone(),
            ttl: self.ttl,
            poll_interval_secs: self.poll_interval,
            max_wait_secs: self.max_wait,
            poll_error_retries: self.poll_error_retries,
            ..ChallengeOptions::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the hosted zones visible to the credentials
    Zones,
    /// Create the challenge TXT record and wait until it is INSYNC
    Set(RecordArgs),
    /// Delete the challenge TXT record and wait until it is INSYNC
    Remove(RecordArgs),
    /// Check whether the challenge TXT record carries the value
    Get(RecordArgs),
    /// Run zones, set, get and remove against a real domain, plain and wildcard
    SelfTest(SelfTestArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Domain being validated, e.g. `example.com` or `*.example.com`
    #[arg(long)]
    pub domain: String,

    /// Record name [default: _acme-challenge.<domain>]
    #[arg(long)]
    pub dns_host: Option<String>,

    /// Key authorization digest published in the record
    #[arg(long)]
    pub value: String,

    /// Treat the domain as a wildcard name
    #[arg(long)]
    pub wildcard: bool,
}

impl RecordArgs {
    pub fn is_wildcard(&self) -> bool {
        self.wildcard || self.domain.starts_with("*.")
    }

    pub fn dns_host(&self) -> String {
        self.dns_host
            .clone()
            .unwrap_or_else(|| challenge_host(&self.domain))
    }

    pub fn set_args(&self) -> SetArgs {
        SetArgs {
            domain: self.domain.clone(),
            challenge: DnsChallenge {
                dns_host: self.dns_host(),
                dns_authorization: self.value.clone(),
                ttl: None,
                wildcard: self.is_wildcard(),
            },
        }
    }

    pub fn get_args(&self) -> GetArgs {
        GetArgs {
            challenge: Some(ChallengeLookup {
                identifier: Some(Identifier {
                    kind: Some("dns".to_string()),
                    value: self.dns_host(),
                }),
                altname: self.domain.clone(),
                wildcard: self.is_wildcard(),
                dns_authorization: self.value.clone(),
            }),
        }
    }
}

#[derive(Args, Debug)]
pub struct SelfTestArgs {
    /// Domain whose hosted zone is used for the test records
    #[arg(long, env = "DOMAIN")]
    pub domain: String,
}

/// `_acme-challenge.<name>`, with any wildcard label dropped.
pub fn challenge_host(domain: &str) -> String {
    let base = domain.strip_prefix("*.").unwrap_or(domain);
    format!("{CHALLENGE_LABEL}.{}", base.trim_end_matches('.'))
}
