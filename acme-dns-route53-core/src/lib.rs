//! ACME DNS-01 challenge core for AWS Route53
//!
//! Turns ACME client `set`/`remove`/`get` calls into Route53 record changes:
//! - resolves a domain (wildcards included) to its hosted zone
//! - builds quoted TXT UPSERT/DELETE change batches
//! - submits the change and waits, with a bounded and cancellable poll loop,
//!   until Route53 reports it INSYNC
//!
//! Configuration is resolved once into a [`ResolvedConfig`]; the services never
//! read the environment themselves. Route53 access goes through the
//! [`ZoneRecordApi`] trait, so another backend can be substituted.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use acme_dns_route53_provider::ZoneRecordApi;
pub use error::{ChallengeError, ChallengeResult};
pub use services::{MODULE_NAME, PropagationWaiter, Route53Challenge, ZoneResolver};
pub use traits::{EnvSource, ProcessEnv};
pub use types::{ChallengeOptions, PollPolicy, ResolvedConfig};
pub use utils::cancellation::{Cancellation, CancellationHandle};
