//! Dashboard Operations
//!
//! The actions behind the dashboard panels: loading statistics, looking up a
//! customer, and predicting churn for a filled-in form. Each returns a typed
//! result; on failure the [`DashboardError`] carries the [`Notice`] to show.

use crate::backend::{BackendError, ChurnBackend, Prediction};
use crate::encoder::{encode, CustomerForm, EncodeError, FeatureVector};
use crate::notice::Notice;
use crate::profile::{recommended_offers, service_statuses, CustomerProfile, RetentionOffer, ServiceStatus};
use crate::stats::DashboardData;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Errors from dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Invalid customer form: {0}")]
    Form(#[from] EncodeError),

    #[error("No customer ID given")]
    MissingCustomerId,

    #[error("Customer lookup for {customer_id} failed: {source}")]
    Lookup {
        customer_id: String,
        #[source]
        source: BackendError,
    },

    #[error("Prediction failed: {0}")]
    Prediction(#[source] BackendError),

    #[error("Failed to load dashboard data: {0}")]
    Stats(#[source] BackendError),
}

impl DashboardError {
    /// What the user should be told
    pub fn notice(&self) -> Notice {
        match self {
            DashboardError::Form(EncodeError::MissingField(_)) => Notice::destructive(
                "Missing information",
                "Please fill in all fields to predict churn risk",
            ),
            DashboardError::Form(e) => Notice::destructive("Invalid information", e.to_string()),
            DashboardError::MissingCustomerId => Notice::destructive(
                "Missing customer ID",
                "Please enter a customer ID to search",
            ),
            DashboardError::Lookup { .. } => Notice::destructive(
                "Customer not found",
                "No customer record found with that ID",
            ),
            DashboardError::Prediction(_) => Notice::destructive(
                "Prediction failed",
                "Unable to predict churn risk. Please try again.",
            ),
            DashboardError::Stats(_) => Notice::destructive(
                "Failed to load dashboard data",
                "Please check your connection and try again",
            ),
        }
    }
}

/// A customer's profile with the derived panels
#[derive(Debug, Clone, Serialize)]
pub struct CustomerView {
    pub profile: CustomerProfile,
    pub services: Vec<ServiceStatus>,
    /// Empty unless the customer has churned
    pub offers: &'static [RetentionOffer],
}

impl CustomerView {
    pub fn new(profile: CustomerProfile) -> Self {
        Self {
            services: service_statuses(&profile),
            offers: recommended_offers(&profile),
            profile,
        }
    }
}

/// Dashboard operations over a churn backend
#[derive(Clone)]
pub struct DashboardService {
    backend: Arc<dyn ChurnBackend>,
}

impl DashboardService {
    pub fn new(backend: Arc<dyn ChurnBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn ChurnBackend {
        self.backend.as_ref()
    }

    /// Aggregate statistics for the summary cards and charts
    pub async fn load_stats(&self) -> Result<DashboardData, DashboardError> {
        self.backend.dashboard_data().await.map_err(|e| {
            tracing::warn!(backend = self.backend.name(), error = %e, "Failed to load dashboard data");
            DashboardError::Stats(e)
        })
    }

    /// Look up a customer by ID
    ///
    /// Surrounding whitespace is ignored; a blank ID fails without calling
    /// the backend.
    pub async fn lookup_customer(&self, customer_id: &str) -> Result<CustomerView, DashboardError> {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return Err(DashboardError::MissingCustomerId);
        }

        match self.backend.customer_profile(customer_id).await {
            Ok(profile) => {
                tracing::info!(customer_id, churned = profile.has_churned(), "Customer found");
                Ok(CustomerView::new(profile))
            }
            Err(e) => {
                tracing::warn!(customer_id, error = %e, "Customer lookup failed");
                Err(DashboardError::Lookup {
                    customer_id: customer_id.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Encode the form and ask the classifier
    ///
    /// Validation happens first; an incomplete or invalid form never
    /// reaches the backend.
    pub async fn predict_churn(&self, form: &CustomerForm) -> Result<PredictionResult, DashboardError> {
        let features = encode(form)?;

        let prediction = self.backend.predict(&features).await.map_err(|e| {
            tracing::warn!(backend = self.backend.name(), error = %e, "Prediction request failed");
            DashboardError::Prediction(e)
        })?;

        tracing::info!(churned = prediction.churned(), "Prediction received");
        Ok(PredictionResult {
            features,
            prediction,
        })
    }
}

/// A prediction together with the vector it was made for
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub features: FeatureVector,
    pub prediction: Prediction,
}
