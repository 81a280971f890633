//! Customer attribute form
//!
//! The sixteen answers a user gives before asking for a churn prediction,
//! plus the canonical categorical domains those answers are drawn from.

use serde::{Deserialize, Deserializer, Serialize};

/// One of the sixteen questions on the prediction form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    SeniorCitizen,
    Partner,
    Dependents,
    Tenure,
    InternetService,
    OnlineSecurity,
    OnlineBackup,
    DeviceProtection,
    TechSupport,
    StreamingTV,
    StreamingMovies,
    Contract,
    PaperlessBilling,
    PaymentMethod,
    MonthlyCharges,
    TotalCharges,
}

impl FormField {
    /// All fields in form order
    pub fn all() -> &'static [FormField] {
        &[
            FormField::SeniorCitizen,
            FormField::Partner,
            FormField::Dependents,
            FormField::Tenure,
            FormField::InternetService,
            FormField::OnlineSecurity,
            FormField::OnlineBackup,
            FormField::DeviceProtection,
            FormField::TechSupport,
            FormField::StreamingTV,
            FormField::StreamingMovies,
            FormField::Contract,
            FormField::PaperlessBilling,
            FormField::PaymentMethod,
            FormField::MonthlyCharges,
            FormField::TotalCharges,
        ]
    }

    /// Attribute name as used on the wire and in the source dataset
    pub fn name(&self) -> &'static str {
        match self {
            FormField::SeniorCitizen => "SeniorCitizen",
            FormField::Partner => "Partner",
            FormField::Dependents => "Dependents",
            FormField::Tenure => "tenure",
            FormField::InternetService => "InternetService",
            FormField::OnlineSecurity => "OnlineSecurity",
            FormField::OnlineBackup => "OnlineBackup",
            FormField::DeviceProtection => "DeviceProtection",
            FormField::TechSupport => "TechSupport",
            FormField::StreamingTV => "StreamingTV",
            FormField::StreamingMovies => "StreamingMovies",
            FormField::Contract => "Contract",
            FormField::PaperlessBilling => "PaperlessBilling",
            FormField::PaymentMethod => "PaymentMethod",
            FormField::MonthlyCharges => "MonthlyCharges",
            FormField::TotalCharges => "TotalCharges",
        }
    }

    /// Look up a field by its wire name (case-sensitive)
    pub fn from_name(name: &str) -> Option<FormField> {
        Self::all().iter().copied().find(|f| f.name() == name)
    }

    /// Whether the field holds a number rather than a categorical choice
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FormField::Tenure | FormField::MonthlyCharges | FormField::TotalCharges
        )
    }

    /// Accepted values for categorical fields (empty for numeric ones)
    pub fn choices(&self) -> &'static [&'static str] {
        match self {
            FormField::InternetService => InternetService::CHOICES,
            FormField::Contract => Contract::CHOICES,
            FormField::PaymentMethod => PaymentMethod::CHOICES,
            f if f.is_numeric() => &[],
            _ => YesNo::CHOICES,
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A categorical domain with exact, case-sensitive canonical strings
pub trait Choice: Sized + Copy {
    /// Canonical strings, in domain order
    const CHOICES: &'static [&'static str];

    /// Parse an exact canonical string
    fn parse(value: &str) -> Option<Self>;
}

/// Two-valued answer used by most questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    No,
    Yes,
}

impl Choice for YesNo {
    const CHOICES: &'static [&'static str] = &["No", "Yes"];

    fn parse(value: &str) -> Option<Self> {
        match value {
            "No" => Some(YesNo::No),
            "Yes" => Some(YesNo::Yes),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternetService {
    Dsl,
    FiberOptic,
    No,
}

impl Choice for InternetService {
    const CHOICES: &'static [&'static str] = &["DSL", "Fiber optic", "No"];

    fn parse(value: &str) -> Option<Self> {
        match value {
            "DSL" => Some(InternetService::Dsl),
            "Fiber optic" => Some(InternetService::FiberOptic),
            "No" => Some(InternetService::No),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contract {
    MonthToMonth,
    OneYear,
    TwoYear,
}

impl Choice for Contract {
    const CHOICES: &'static [&'static str] = &["Month-to-month", "One year", "Two year"];

    fn parse(value: &str) -> Option<Self> {
        match value {
            "Month-to-month" => Some(Contract::MonthToMonth),
            "One year" => Some(Contract::OneYear),
            "Two year" => Some(Contract::TwoYear),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    BankTransfer,
    CreditCard,
    ElectronicCheck,
    MailedCheck,
}

impl Choice for PaymentMethod {
    const CHOICES: &'static [&'static str] = &[
        "Bank transfer (automatic)",
        "Credit card (automatic)",
        "Electronic check",
        "Mailed check",
    ];

    fn parse(value: &str) -> Option<Self> {
        match value {
            "Bank transfer (automatic)" => Some(PaymentMethod::BankTransfer),
            "Credit card (automatic)" => Some(PaymentMethod::CreditCard),
            "Electronic check" => Some(PaymentMethod::ElectronicCheck),
            "Mailed check" => Some(PaymentMethod::MailedCheck),
            _ => None,
        }
    }
}

/// Raw form state, one string per question
///
/// Values are kept exactly as entered; validation happens in
/// [`encode`](super::encode). Numeric answers may be written as numbers in
/// TOML/JSON form files and are stored in their textual form. Unknown keys
/// (including miscased ones such as `Tenure`) are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerForm {
    #[serde(rename = "SeniorCitizen", default, deserialize_with = "form_value")]
    pub senior_citizen: String,
    #[serde(rename = "Partner", default, deserialize_with = "form_value")]
    pub partner: String,
    #[serde(rename = "Dependents", default, deserialize_with = "form_value")]
    pub dependents: String,
    #[serde(rename = "tenure", default, deserialize_with = "form_value")]
    pub tenure: String,
    #[serde(rename = "InternetService", default, deserialize_with = "form_value")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity", default, deserialize_with = "form_value")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup", default, deserialize_with = "form_value")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection", default, deserialize_with = "form_value")]
    pub device_protection: String,
    #[serde(rename = "TechSupport", default, deserialize_with = "form_value")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV", default, deserialize_with = "form_value")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies", default, deserialize_with = "form_value")]
    pub streaming_movies: String,
    #[serde(rename = "Contract", default, deserialize_with = "form_value")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling", default, deserialize_with = "form_value")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod", default, deserialize_with = "form_value")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges", default, deserialize_with = "form_value")]
    pub monthly_charges: String,
    #[serde(rename = "TotalCharges", default, deserialize_with = "form_value")]
    pub total_charges: String,
}

impl CustomerForm {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current answer for a field
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::SeniorCitizen => &self.senior_citizen,
            FormField::Partner => &self.partner,
            FormField::Dependents => &self.dependents,
            FormField::Tenure => &self.tenure,
            FormField::InternetService => &self.internet_service,
            FormField::OnlineSecurity => &self.online_security,
            FormField::OnlineBackup => &self.online_backup,
            FormField::DeviceProtection => &self.device_protection,
            FormField::TechSupport => &self.tech_support,
            FormField::StreamingTV => &self.streaming_tv,
            FormField::StreamingMovies => &self.streaming_movies,
            FormField::Contract => &self.contract,
            FormField::PaperlessBilling => &self.paperless_billing,
            FormField::PaymentMethod => &self.payment_method,
            FormField::MonthlyCharges => &self.monthly_charges,
            FormField::TotalCharges => &self.total_charges,
        }
    }

    /// Set the answer for a field
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::SeniorCitizen => &mut self.senior_citizen,
            FormField::Partner => &mut self.partner,
            FormField::Dependents => &mut self.dependents,
            FormField::Tenure => &mut self.tenure,
            FormField::InternetService => &mut self.internet_service,
            FormField::OnlineSecurity => &mut self.online_security,
            FormField::OnlineBackup => &mut self.online_backup,
            FormField::DeviceProtection => &mut self.device_protection,
            FormField::TechSupport => &mut self.tech_support,
            FormField::StreamingTV => &mut self.streaming_tv,
            FormField::StreamingMovies => &mut self.streaming_movies,
            FormField::Contract => &mut self.contract,
            FormField::PaperlessBilling => &mut self.paperless_billing,
            FormField::PaymentMethod => &mut self.payment_method,
            FormField::MonthlyCharges => &mut self.monthly_charges,
            FormField::TotalCharges => &mut self.total_charges,
        };
        *slot = value.into();
    }

    /// Builder method: set a field
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Fields that are empty or whitespace-only, in form order
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::all()
            .iter()
            .copied()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    /// Overlay every non-empty answer from `other` onto this form
    pub fn merge(&mut self, other: &CustomerForm) {
        for field in FormField::all() {
            let value = other.get(*field);
            if !value.trim().is_empty() {
                self.set(*field, value);
            }
        }
    }
}

/// Accept strings or numbers and keep their textual form
fn form_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}
