//! # Churnwise
//!
//! Customer churn analytics client: encodes customer attributes for a churn
//! classifier, talks to the churn service, and turns its answers into what a
//! retention dashboard shows.
//!
//! ## Features
//!
//! - **Feature encoding**: 16-answer customer form to the fixed 39-slot
//!   one-hot vector the classifier expects
//! - **Chat extraction**: narrows support-chat answers to the field a
//!   question asks about
//! - **Backends**: REST client for the churn service, or an offline Telco
//!   CSV dataset for stats and lookups
//! - **Dashboard**: stats, customer insights, retention offers, predictions
//!
//! ## Modules
//!
//! - [`encoder`]: customer form and feature vector
//! - [`extract`]: keyword-driven response extraction
//! - [`backend`]: the [`ChurnBackend`] trait and HTTP client
//! - [`dashboard`]: dashboard operations and user notices
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use churnwise::{Config, DashboardService, HttpBackend};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let backend = Arc::new(HttpBackend::new(config.backend)?);
//!     let dashboard = DashboardService::new(backend);
//!
//!     let stats = dashboard.load_stats().await?;
//!     for card in stats.cards() {
//!         println!("{}: {}", card.label, card.value);
//!     }
//!
//!     let view = dashboard.lookup_customer("7590-VHVEG").await?;
//!     println!("{} offers", view.offers.len());
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod encoder;
pub mod extract;
pub mod notice;
pub mod profile;
pub mod stats;

// Re-export top-level types for convenience
pub use encoder::{encode, CustomerForm, EncodeError, FeatureVector, FormField, FEATURE_COUNT};

pub use extract::{extract, NO_RELEVANT_INFO};

pub use backend::{
    AuthToken, BackendError, BackendResult, ChatReply, ChurnBackend, HealthStatus, HttpBackend,
    Prediction,
};

pub use dataset::{Dataset, DatasetBackend, DatasetError};

pub use dashboard::{CustomerView, DashboardError, DashboardService, PredictionResult};

pub use chat::{ChatMessage, ChatOutcome, ChatSession, Sender};

pub use profile::{CustomerProfile, RetentionOffer, ServiceStatus};

pub use stats::{DashboardData, DisplayFormat, StatCard};

pub use notice::{Notice, Severity};

pub use config::{BackendConfig, Config, ConfigError, LoggingConfig};
