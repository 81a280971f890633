//! Offline Telco Dataset
//!
//! Reads the Telco customer churn CSV into typed profiles and answers the
//! dashboard and customer lookup queries locally, without a churn service.
//!
//! Rows that fail validation are skipped and counted rather than aborting
//! the load.

use crate::backend::{
    AuthToken, BackendError, BackendResult, ChatReply, ChurnBackend, HealthStatus, Prediction,
};
use crate::encoder::FeatureVector;
use crate::profile::CustomerProfile;
use crate::stats::{ChurnRate, DashboardData, YesNoCounts};
use async_trait::async_trait;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No valid customers found in the data ({skipped} rows skipped)")]
    Empty { skipped: usize },
}

/// Customer profiles loaded from a CSV file
#[derive(Debug, Clone)]
pub struct Dataset {
    customers: Vec<CustomerProfile>,
    rows_skipped: usize,
    errors: Vec<String>,
}

impl Dataset {
    /// Load a dataset from a CSV file with a header row
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let dataset = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            customers = dataset.len(),
            skipped = dataset.rows_skipped,
            "Loaded customer dataset"
        );

        Ok(dataset)
    }

    /// Parse CSV data from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

        // Header problems are fatal; row problems are not
        reader.headers()?;

        let mut customers = Vec::new();
        let mut errors = Vec::new();

        for (row, record) in reader.deserialize::<CustomerProfile>().enumerate() {
            match record {
                Ok(profile) => customers.push(profile),
                Err(e) => {
                    // row 1 is the header
                    errors.push(format!("Row {}: {}", row + 2, e));
                }
            }
        }

        if !errors.is_empty() {
            tracing::warn!(skipped = errors.len(), "Skipped invalid dataset rows");
        }

        if customers.is_empty() {
            return Err(DatasetError::Empty {
                skipped: errors.len(),
            });
        }

        Ok(Self {
            customers,
            rows_skipped: errors.len(),
            errors,
        })
    }

    pub fn customers(&self) -> &[CustomerProfile] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Number of rows that failed validation
    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }

    /// One message per skipped row
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Find a customer by ID (exact match)
    pub fn find(&self, customer_id: &str) -> Option<&CustomerProfile> {
        self.customers.iter().find(|c| c.customer_id == customer_id)
    }

    /// Aggregate statistics in the shape the churn service reports them
    ///
    /// Any Churn label other than "Yes" counts as retained.
    pub fn summarize(&self) -> DashboardData {
        let total = self.customers.len() as f64;
        let churned = self.customers.iter().filter(|c| c.has_churned()).count() as f64;
        let retained = total - churned;
        let mean = |f: fn(&CustomerProfile) -> f64| {
            if total > 0.0 {
                Some(self.customers.iter().map(f).sum::<f64>() / total)
            } else {
                None
            }
        };

        DashboardData {
            total_customers: Some(total),
            churn_rate: mean(|c| if c.has_churned() { 1.0 } else { 0.0 }).map(ChurnRate::Fraction),
            avg_tenure: mean(|c| c.tenure),
            avg_monthly_charge: mean(|c| c.monthly_charges),
            active_customers: Some(retained),
            churn_distribution: Some(YesNoCounts {
                yes: Some(churned),
                no: Some(retained),
            }),
            churn_trend: None,
            churn_reasons: None,
        }
    }
}

/// [`ChurnBackend`] over a local dataset
///
/// Answers stats and customer lookups; everything that needs the model or
/// the account service reports [`BackendError::Unsupported`].
pub struct DatasetBackend {
    dataset: Dataset,
}

impl DatasetBackend {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Load the CSV at `path`
    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        Ok(Self::new(Dataset::load(path)?))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[async_trait]
impl ChurnBackend for DatasetBackend {
    fn name(&self) -> &str {
        "dataset"
    }

    async fn dashboard_data(&self) -> BackendResult<DashboardData> {
        Ok(self.dataset.summarize())
    }

    async fn customer_profile(&self, customer_id: &str) -> BackendResult<CustomerProfile> {
        self.dataset
            .find(customer_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("customer {}", customer_id)))
    }

    async fn predict(&self, _features: &FeatureVector) -> BackendResult<Prediction> {
        Err(BackendError::Unsupported("Churn prediction"))
    }

    async fn chat(&self, _query: &str) -> BackendResult<ChatReply> {
        Err(BackendError::Unsupported("Chat"))
    }

    async fn health(&self) -> BackendResult<HealthStatus> {
        Ok(HealthStatus {
            status: "up".to_string(),
            reason: None,
        })
    }

    async fn login(&self, _email: &str, _password: &str) -> BackendResult<AuthToken> {
        Err(BackendError::Unsupported("Login"))
    }

    async fn register(&self, _email: &str, _password: &str) -> BackendResult<String> {
        Err(BackendError::Unsupported("Registration"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "customerID,gender,SeniorCitizen,Partner,Dependents,tenure,PhoneService,MultipleLines,InternetService,OnlineSecurity,OnlineBackup,DeviceProtection,TechSupport,StreamingTV,StreamingMovies,Contract,PaperlessBilling,PaymentMethod,MonthlyCharges,TotalCharges,Churn";

    const ROWS: &[&str] = &[
        "7590-VHVEG,Female,0,Yes,No,1,No,No phone service,DSL,No,Yes,No,No,No,No,Month-to-month,Yes,Electronic check,29.85,29.85,No",
        "5575-GNVDE,Male,0,No,No,34,Yes,No,DSL,Yes,No,Yes,No,No,No,One year,No,Mailed check,56.95,1889.5,No",
        "3668-QPYBK,Male,0,No,No,2,Yes,No,DSL,Yes,Yes,No,No,No,No,Month-to-month,Yes,Mailed check,53.85,108.15,Yes",
        "4472-LVYGI,Female,0,Yes,Yes,0,No,No phone service,DSL,Yes,No,Yes,Yes,Yes,No,Two year,Yes,Bank transfer (automatic),52.55, ,No",
    ];

    fn csv_text(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    #[test]
    fn test_load_and_find() {
        let dataset = Dataset::from_reader(csv_text(ROWS).as_bytes()).unwrap();

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.rows_skipped(), 0);

        let customer = dataset.find("3668-QPYBK").unwrap();
        assert!(customer.has_churned());
        assert_eq!(customer.monthly_charges, 53.85);

        // blank TotalCharges for a first-month customer
        assert_eq!(dataset.find("4472-LVYGI").unwrap().total_charges, 0.0);
        assert!(dataset.find("0000-NONE").is_none());
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let mut rows = ROWS.to_vec();
        rows.push("9999-BAD,Male,7,No,No,abc,Yes,No,DSL,No,No,No,No,No,No,Month-to-month,Yes,Mailed check,10,10,No");
        rows.push("8888-SHORT,Male,0");

        let dataset = Dataset::from_reader(csv_text(&rows).as_bytes()).unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.rows_skipped(), 2);
        assert!(dataset.errors()[0].starts_with("Row 6:"));
    }

    #[test]
    fn test_no_valid_rows_is_an_error() {
        let err = Dataset::from_reader(csv_text(&["x,y,z"]).as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Empty { skipped: 1 }));
    }

    #[test]
    fn test_summarize_matches_service_shape() {
        let dataset = Dataset::from_reader(csv_text(ROWS).as_bytes()).unwrap();
        let data = dataset.summarize();

        assert_eq!(data.total_customers, Some(4.0));
        assert_eq!(data.churn_rate_value(), Some(0.25));
        assert_eq!(data.avg_tenure, Some(37.0 / 4.0));
        assert_eq!(data.active_customers, Some(3.0));

        let slices = data.distribution();
        assert_eq!(slices[0].value, 3.0);
        assert_eq!(slices[1].value, 1.0);
        assert!(data.churn_trend.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(csv_text(ROWS).as_bytes()).unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 4);

        let err = Dataset::load(Path::new("/nonexistent/telco.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[tokio::test]
    async fn test_dataset_backend() {
        let backend = DatasetBackend::new(Dataset::from_reader(csv_text(ROWS).as_bytes()).unwrap());

        let profile = backend.customer_profile("5575-GNVDE").await.unwrap();
        assert_eq!(profile.contract, "One year");

        let err = backend.customer_profile("missing").await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));

        let data = backend.dashboard_data().await.unwrap();
        assert_eq!(data.total_customers, Some(4.0));

        assert!(backend.health().await.unwrap().is_up());
        assert!(matches!(
            backend.chat("tenure").await,
            Err(BackendError::Unsupported(_))
        ));
        assert!(matches!(
            backend.predict(&FeatureVector::default()).await,
            Err(BackendError::Unsupported(_))
        ));
    }
}
