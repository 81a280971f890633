//! Customer Profiles
//!
//! Typed customer records plus the derived views shown alongside them:
//! which services the customer has and which retention offers apply.

mod retention;
mod services;
mod types;

pub use retention::{recommended_offers, RetentionOffer, RETENTION_OFFERS};
pub use services::{service_statuses, ServiceStatus};
pub use types::CustomerProfile;

#[cfg(test)]
pub(crate) use types::fixtures;
