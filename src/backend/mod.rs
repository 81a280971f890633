//! Churn Service Backends
//!
//! Everything the dashboard needs from the outside world goes through the
//! [`ChurnBackend`] trait:
//!
//! - **HttpBackend**: REST client for the churn service
//! - **DatasetBackend** (in [`crate::dataset`]): offline Telco CSV source
//!   that answers stats and customer lookups

mod http;

#[cfg(test)]
pub(crate) mod fake;

pub use http::HttpBackend;

use crate::encoder::FeatureVector;
use crate::profile::CustomerProfile;
use crate::stats::DashboardData;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Common trait for all churn data sources
#[async_trait]
pub trait ChurnBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Aggregate churn statistics
    async fn dashboard_data(&self) -> BackendResult<DashboardData>;

    /// Look up one customer by ID
    async fn customer_profile(&self, customer_id: &str) -> BackendResult<CustomerProfile>;

    /// Ask the classifier about an encoded customer
    async fn predict(&self, features: &FeatureVector) -> BackendResult<Prediction>;

    /// Send a support question
    async fn chat(&self, query: &str) -> BackendResult<ChatReply>;

    /// Service health
    async fn health(&self) -> BackendResult<HealthStatus>;

    /// Exchange credentials for a bearer token
    async fn login(&self, email: &str, password: &str) -> BackendResult<AuthToken>;

    /// Create an account; returns the service's confirmation message
    async fn register(&self, email: &str, password: &str) -> BackendResult<String>;
}

/// Classifier verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPrediction")]
pub struct Prediction {
    pub churn_prediction: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub churn_probability: Option<f64>,
}

#[derive(Deserialize)]
struct RawPrediction {
    churn_prediction: f64,
    #[serde(default)]
    churn_probability: Option<f64>,
}

impl TryFrom<RawPrediction> for Prediction {
    type Error = String;

    fn try_from(raw: RawPrediction) -> Result<Self, Self::Error> {
        let churn_prediction = if raw.churn_prediction == 0.0 {
            0
        } else if raw.churn_prediction == 1.0 {
            1
        } else {
            return Err(format!(
                "churn_prediction must be 0 or 1, got {}",
                raw.churn_prediction
            ));
        };

        if let Some(p) = raw.churn_probability {
            if !p.is_finite() || !(0.0..=100.0).contains(&p) {
                return Err(format!("churn_probability out of range: {}", p));
            }
        }

        Ok(Self {
            churn_prediction,
            churn_probability: raw.churn_probability,
        })
    }
}

impl Prediction {
    pub fn churned(&self) -> bool {
        self.churn_prediction == 1
    }

    /// Verdict as shown to the user
    pub fn label(&self) -> &'static str {
        if self.churned() {
            "Yes (Churn)"
        } else {
            "No (No Churn)"
        }
    }

    /// Probability as a percentage
    ///
    /// Values up to 1 are fractions; larger values are already percentages.
    pub fn probability_percent(&self) -> Option<f64> {
        self.churn_probability
            .map(|p| if p <= 1.0 { p * 100.0 } else { p })
    }
}

/// Answer from the support chat endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Some services answer with a list of lines; they are joined with spaces
    #[serde(default, deserialize_with = "reply_text")]
    pub response: Option<String>,
}

fn reply_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Lines(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Lines(lines)) => Some(lines.join(" ")),
        None => None,
    }
    .filter(|s| !s.trim().is_empty()))
}

/// Service health report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        self.status == "up"
    }
}

/// Bearer token issued by the login endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Errors that can occur when talking to a churn backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Churn service unavailable: {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("{0} is not supported by this data source")]
    Unsupported(&'static str),
}

impl BackendError {
    /// Whether the failure happened before the service answered
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            BackendError::Unavailable(_) | BackendError::Timeout | BackendError::Request(_)
        )
    }
}

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_validation() {
        let p: Prediction = serde_json::from_str(r#"{"churn_prediction": 1}"#).unwrap();
        assert!(p.churned());
        assert_eq!(p.label(), "Yes (Churn)");
        assert_eq!(p.probability_percent(), None);

        let p: Prediction =
            serde_json::from_str(r#"{"churn_prediction": 0, "churn_probability": 0.25}"#).unwrap();
        assert!(!p.churned());
        assert_eq!(p.label(), "No (No Churn)");
        assert_eq!(p.probability_percent(), Some(25.0));

        let p: Prediction =
            serde_json::from_str(r#"{"churn_prediction": 1, "churn_probability": 73}"#).unwrap();
        assert_eq!(p.probability_percent(), Some(73.0));

        assert!(serde_json::from_str::<Prediction>(r#"{"churn_prediction": 2}"#).is_err());
        assert!(serde_json::from_str::<Prediction>(
            r#"{"churn_prediction": 0, "churn_probability": -1}"#
        )
        .is_err());
        assert!(serde_json::from_str::<Prediction>(r#"{}"#).is_err());
    }

    #[test]
    fn test_chat_reply_shapes() {
        let reply: ChatReply = serde_json::from_str(r#"{"response": "Tenure: 5"}"#).unwrap();
        assert_eq!(reply.response.as_deref(), Some("Tenure: 5"));

        let reply: ChatReply =
            serde_json::from_str(r#"{"response": ["Tenure: 5,", "Contract: One year"]}"#).unwrap();
        assert_eq!(reply.response.as_deref(), Some("Tenure: 5, Contract: One year"));

        let reply: ChatReply = serde_json::from_str(r#"{"response": ""}"#).unwrap();
        assert_eq!(reply.response, None);

        let reply: ChatReply = serde_json::from_str(r#"{"detail": "x"}"#).unwrap();
        assert_eq!(reply.response, None);
    }

    #[test]
    fn test_health_status() {
        let up: HealthStatus = serde_json::from_str(r#"{"status": "up"}"#).unwrap();
        assert!(up.is_up());

        let down: HealthStatus =
            serde_json::from_str(r#"{"status": "down", "reason": "Model is not loaded"}"#).unwrap();
        assert!(!down.is_up());
        assert_eq!(down.reason.as_deref(), Some("Model is not loaded"));
    }

    #[test]
    fn test_error_classification() {
        assert!(BackendError::Timeout.is_connection());
        assert!(BackendError::Unavailable("refused".into()).is_connection());
        assert!(!BackendError::Decode("bad".into()).is_connection());
        assert!(!BackendError::Api { status: 500, message: "boom".into() }.is_connection());
        assert_eq!(
            BackendError::Unsupported("chat").to_string(),
            "chat is not supported by this data source"
        );
    }
}
