//! Feature Encoding
//!
//! Turns a filled-in [`CustomerForm`] into the one-hot [`FeatureVector`] the
//! churn classifier was trained on.
//!
//! ## Encoding rules
//!
//! - Every categorical answer becomes one indicator per domain value.
//! - The six internet add-on services each get `_No`, `_Yes` and
//!   `_NoInternetService` indicators. The first two follow the service's own
//!   answer; `_NoInternetService` is set whenever InternetService is "No",
//!   so it can be set together with `_Yes`. This matches how the training
//!   data was encoded.
//! - `tenure`, `MonthlyCharges` and `TotalCharges` pass through as numbers.

mod error;
mod form;
mod vector;

pub use error::EncodeError;
pub use form::{Choice, Contract, CustomerForm, FormField, InternetService, PaymentMethod, YesNo};
pub use vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Indicator names for the internet add-on services: `[_No, _NoInternetService, _Yes]`
const ADDON_FEATURES: [(FormField, [&str; 3]); 6] = [
    (
        FormField::OnlineSecurity,
        ["OnlineSecurity_No", "OnlineSecurity_NoInternetService", "OnlineSecurity_Yes"],
    ),
    (
        FormField::OnlineBackup,
        ["OnlineBackup_No", "OnlineBackup_NoInternetService", "OnlineBackup_Yes"],
    ),
    (
        FormField::DeviceProtection,
        ["DeviceProtection_No", "DeviceProtection_NoInternetService", "DeviceProtection_Yes"],
    ),
    (
        FormField::TechSupport,
        ["TechSupport_No", "TechSupport_NoInternetService", "TechSupport_Yes"],
    ),
    (
        FormField::StreamingTV,
        ["StreamingTV_No", "StreamingTV_NoInternetService", "StreamingTV_Yes"],
    ),
    (
        FormField::StreamingMovies,
        ["StreamingMovies_No", "StreamingMovies_NoInternetService", "StreamingMovies_Yes"],
    ),
];

/// Encode a form into the classifier's feature vector
///
/// Validation runs before anything is encoded: empty answers first (all of
/// them are reported), then categorical domains, then numbers.
pub fn encode(form: &CustomerForm) -> Result<FeatureVector, EncodeError> {
    let missing = form.missing_fields();
    if !missing.is_empty() {
        return Err(EncodeError::MissingField(missing));
    }

    let senior = choice::<YesNo>(form, FormField::SeniorCitizen)?;
    let partner = choice::<YesNo>(form, FormField::Partner)?;
    let dependents = choice::<YesNo>(form, FormField::Dependents)?;
    let internet = choice::<InternetService>(form, FormField::InternetService)?;

    let mut addons = [YesNo::No; 6];
    for (slot, (field, _)) in addons.iter_mut().zip(ADDON_FEATURES.iter()) {
        *slot = choice::<YesNo>(form, *field)?;
    }

    let contract = choice::<Contract>(form, FormField::Contract)?;
    let paperless = choice::<YesNo>(form, FormField::PaperlessBilling)?;
    let payment = choice::<PaymentMethod>(form, FormField::PaymentMethod)?;

    let tenure = number(form, FormField::Tenure)?;
    let monthly = number(form, FormField::MonthlyCharges)?;
    let total = number(form, FormField::TotalCharges)?;

    let mut vector = FeatureVector::with_capacity(FEATURE_COUNT);

    vector.push_flag("SeniorCitizen_No", senior == YesNo::No);
    vector.push_flag("SeniorCitizen_Yes", senior == YesNo::Yes);
    vector.push_flag("Partner_No", partner == YesNo::No);
    vector.push_flag("Partner_Yes", partner == YesNo::Yes);
    vector.push_flag("Dependents_No", dependents == YesNo::No);
    vector.push_flag("Dependents_Yes", dependents == YesNo::Yes);

    vector.push_flag("InternetService_DSL", internet == InternetService::Dsl);
    vector.push_flag("InternetService_Fiber", internet == InternetService::FiberOptic);
    vector.push_flag("InternetService_No", internet == InternetService::No);

    let no_internet = internet == InternetService::No;
    for (answer, (_, [no, no_internet_service, yes])) in addons.iter().zip(ADDON_FEATURES.iter()) {
        vector.push_flag(*no, *answer == YesNo::No);
        vector.push_flag(*no_internet_service, no_internet);
        vector.push_flag(*yes, *answer == YesNo::Yes);
    }

    vector.push_flag("Contract_MonthToMonth", contract == Contract::MonthToMonth);
    vector.push_flag("Contract_OneYear", contract == Contract::OneYear);
    vector.push_flag("Contract_TwoYear", contract == Contract::TwoYear);

    vector.push_flag("PaperlessBilling_No", paperless == YesNo::No);
    vector.push_flag("PaperlessBilling_Yes", paperless == YesNo::Yes);

    vector.push_flag("PaymentMethod_BankTransfer", payment == PaymentMethod::BankTransfer);
    vector.push_flag("PaymentMethod_CreditCard", payment == PaymentMethod::CreditCard);
    vector.push_flag("PaymentMethod_ElectronicCheck", payment == PaymentMethod::ElectronicCheck);
    vector.push_flag("PaymentMethod_MailedCheck", payment == PaymentMethod::MailedCheck);

    vector.push("tenure", tenure);
    vector.push("MonthlyCharges", monthly);
    vector.push("TotalCharges", total);

    debug_assert_eq!(vector.len(), FEATURE_COUNT);

    Ok(vector)
}

fn choice<C: Choice>(form: &CustomerForm, field: FormField) -> Result<C, EncodeError> {
    let value = form.get(field);
    C::parse(value).ok_or_else(|| EncodeError::UnknownValue {
        field,
        value: value.to_string(),
    })
}

fn number(form: &CustomerForm, field: FormField) -> Result<f64, EncodeError> {
    let value = form.get(field);
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| EncodeError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
