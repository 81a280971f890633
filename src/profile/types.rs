//! Customer profile record
//!
//! One row of the Telco customer churn dataset, as returned by the
//! customer lookup endpoint.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A customer's account, services and churn label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerProfile {
    #[serde(rename = "customerID")]
    pub customer_id: String,
    pub gender: String,
    #[serde(rename = "SeniorCitizen", deserialize_with = "senior_flag")]
    pub senior_citizen: u8,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    #[serde(deserialize_with = "lenient_number")]
    pub tenure: f64,
    #[serde(rename = "PhoneService")]
    pub phone_service: String,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: String,
    #[serde(rename = "InternetService")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: String,
    #[serde(rename = "TechSupport")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges", deserialize_with = "lenient_number")]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges", deserialize_with = "lenient_number")]
    pub total_charges: f64,
    #[serde(rename = "Churn")]
    pub churn: String,
}

impl CustomerProfile {
    /// Whether the customer is labelled as churned
    pub fn has_churned(&self) -> bool {
        self.churn == "Yes"
    }

    pub fn is_senior(&self) -> bool {
        self.senior_citizen == 1
    }

    /// Whether the customer has any internet plan
    pub fn has_internet(&self) -> bool {
        self.internet_service != "No"
    }
}

/// SeniorCitizen is 0/1 in the dataset; "No"/"Yes" is accepted too
fn senior_flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n @ (0 | 1)) => Ok(n as u8),
        Raw::Float(f) if f == 0.0 || f == 1.0 => Ok(f as u8),
        Raw::Text(s) => match s.trim() {
            "0" | "No" => Ok(0),
            "1" | "Yes" => Ok(1),
            other => Err(de::Error::custom(format!(
                "invalid SeniorCitizen value: {:?}",
                other
            ))),
        },
        _ => Err(de::Error::custom("SeniorCitizen must be 0 or 1")),
    }
}

/// Numbers may arrive as JSON numbers or numeric strings
///
/// A blank string is read as 0: the public dataset leaves TotalCharges blank
/// for customers in their first month.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) if s.trim().is_empty() => 0.0,
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid number: {:?}", s)))?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom("number must be finite"))
    }
}
