//! Encoded feature vector
//!
//! An ordered list of named numeric features. Serializes as a JSON object
//! whose keys appear in canonical order.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Number of features produced for every form
pub const FEATURE_COUNT: usize = 39;

/// Canonical feature names, in output order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "SeniorCitizen_No",
    "SeniorCitizen_Yes",
    "Partner_No",
    "Partner_Yes",
    "Dependents_No",
    "Dependents_Yes",
    "InternetService_DSL",
    "InternetService_Fiber",
    "InternetService_No",
    "OnlineSecurity_No",
    "OnlineSecurity_NoInternetService",
    "OnlineSecurity_Yes",
    "OnlineBackup_No",
    "OnlineBackup_NoInternetService",
    "OnlineBackup_Yes",
    "DeviceProtection_No",
    "DeviceProtection_NoInternetService",
    "DeviceProtection_Yes",
    "TechSupport_No",
    "TechSupport_NoInternetService",
    "TechSupport_Yes",
    "StreamingTV_No",
    "StreamingTV_NoInternetService",
    "StreamingTV_Yes",
    "StreamingMovies_No",
    "StreamingMovies_NoInternetService",
    "StreamingMovies_Yes",
    "Contract_MonthToMonth",
    "Contract_OneYear",
    "Contract_TwoYear",
    "PaperlessBilling_No",
    "PaperlessBilling_Yes",
    "PaymentMethod_BankTransfer",
    "PaymentMethod_CreditCard",
    "PaymentMethod_ElectronicCheck",
    "PaymentMethod_MailedCheck",
    "tenure",
    "MonthlyCharges",
    "TotalCharges",
];

/// Named numeric features ready for the prediction endpoint
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    features: Vec<(&'static str, f64)>,
}

impl FeatureVector {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            features: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: f64) {
        self.features.push((name, value));
    }

    pub(crate) fn push_flag(&mut self, name: &'static str, set: bool) {
        self.push(name, if set { 1.0 } else { 0.0 });
    }

    /// Value of a feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.features
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate `(name, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.features.iter().copied()
    }

    /// Feature names in order
    pub fn names(&self) -> Vec<&'static str> {
        self.features.iter().map(|(n, _)| *n).collect()
    }

    /// Feature values in order
    pub fn values(&self) -> Vec<f64> {
        self.features.iter().map(|(_, v)| *v).collect()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.features.len()))?;
        for (name, value) in &self.features {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
