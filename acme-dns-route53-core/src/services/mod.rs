//! Business logic service layer

mod challenge_service;
pub mod propagation;
pub mod record_builder;
pub mod zone_resolver;

pub use challenge_service::{MODULE_NAME, Route53Challenge};
pub use propagation::PropagationWaiter;
pub use zone_resolver::ZoneResolver;
