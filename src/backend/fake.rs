//! In-memory backend for tests

use super::*;
use crate::encoder::FeatureVector;
use crate::profile::CustomerProfile;
use crate::stats::DashboardData;
use async_trait::async_trait;
use std::sync::Mutex;

/// Canned answers; each call takes the configured result or fails with
/// a connection error when none is set
#[derive(Default)]
pub struct FakeBackend {
    pub chat: Mutex<Option<BackendResult<ChatReply>>>,
    pub predict: Mutex<Option<BackendResult<Prediction>>>,
    pub dashboard: Mutex<Option<BackendResult<DashboardData>>>,
    pub customers: Vec<CustomerProfile>,
    pub queries: Mutex<Vec<String>>,
    pub predictions: Mutex<Vec<FeatureVector>>,
}

impl FakeBackend {
    pub fn with_chat(result: BackendResult<ChatReply>) -> Self {
        Self {
            chat: Mutex::new(Some(result)),
            ..Self::default()
        }
    }

    pub fn with_predict(result: BackendResult<Prediction>) -> Self {
        Self {
            predict: Mutex::new(Some(result)),
            ..Self::default()
        }
    }

    pub fn with_dashboard(result: BackendResult<DashboardData>) -> Self {
        Self {
            dashboard: Mutex::new(Some(result)),
            ..Self::default()
        }
    }

    pub fn with_customers(customers: Vec<CustomerProfile>) -> Self {
        Self {
            customers,
            ..Self::default()
        }
    }
}

fn take<T>(slot: &Mutex<Option<BackendResult<T>>>) -> BackendResult<T> {
    slot.lock()
        .unwrap()
        .take()
        .unwrap_or_else(|| Err(BackendError::Unavailable("connection refused".into())))
}

#[async_trait]
impl ChurnBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn dashboard_data(&self) -> BackendResult<DashboardData> {
        take(&self.dashboard)
    }

    async fn customer_profile(&self, customer_id: &str) -> BackendResult<CustomerProfile> {
        self.customers
            .iter()
            .find(|c| c.customer_id == customer_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(customer_id.to_string()))
    }

    async fn predict(&self, features: &FeatureVector) -> BackendResult<Prediction> {
        self.predictions.lock().unwrap().push(features.clone());
        take(&self.predict)
    }

    async fn chat(&self, query: &str) -> BackendResult<ChatReply> {
        self.queries.lock().unwrap().push(query.to_string());
        take(&self.chat)
    }

    async fn health(&self) -> BackendResult<HealthStatus> {
        Ok(HealthStatus {
            status: "up".to_string(),
            reason: None,
        })
    }

    async fn login(&self, email: &str, _password: &str) -> BackendResult<AuthToken> {
        Ok(AuthToken {
            access_token: email.to_string(),
            token_type: "bearer".to_string(),
        })
    }

    async fn register(&self, _email: &str, _password: &str) -> BackendResult<String> {
        Ok("User registered successfully".to_string())
    }
}
