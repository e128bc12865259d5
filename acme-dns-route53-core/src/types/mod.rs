//! Type definition module

mod challenge;
mod config;

pub use challenge::{
    ChallengeLookup, ChallengeRequest, DnsAuthorization, DnsChallenge, GetArgs, Identifier,
    SetArgs,
};
pub use config::{ChallengeOptions, DEFAULT_REGION, DEFAULT_TTL, PollPolicy, ResolvedConfig};

// Re-export the provider library's public types
pub use acme_dns_route53_provider::{
    ChangeAction, ChangeInfo, ChangeRequest, ChangeStatus, HostedZone, ProviderCredentials,
    RecordSet, RecordType,
};
