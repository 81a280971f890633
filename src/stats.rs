//! Dashboard Statistics
//!
//! Typed view of the aggregate churn numbers the backend reports, plus the
//! derived series and display strings the dashboard shows.

use serde::{Deserialize, Serialize};

/// Placeholder shown for any value the backend did not provide
pub const NOT_AVAILABLE: &str = "Data not available";

/// Aggregate churn statistics; every field is optional on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_customers: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churn_rate: Option<ChurnRate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_tenure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_monthly_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_customers: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churn_distribution: Option<YesNoCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churn_trend: Option<Vec<TrendPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churn_reasons: Option<Vec<ChurnReason>>,
}

/// Churn rate as reported: either a ready fraction or raw Yes/No counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChurnRate {
    Fraction(f64),
    Counts(YesNoCounts),
}

/// Customer counts split by churn label
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YesNoCounts {
    #[serde(rename = "Yes", default, skip_serializing_if = "Option::is_none")]
    pub yes: Option<f64>,
    #[serde(rename = "No", default, skip_serializing_if = "Option::is_none")]
    pub no: Option<f64>,
}

/// Churn rate for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    #[serde(rename = "churnRate")]
    pub churn_rate: f64,
}

/// Share of churned customers citing a reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnReason {
    pub reason: String,
    pub percentage: f64,
}

/// One slice of the churn distribution chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub name: &'static str,
    pub value: f64,
    /// Fraction of the whole, 0 when the whole is empty
    pub share: f64,
}

/// A labelled summary number, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

/// How a summary number is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFormat {
    /// Fraction shown as a percentage with one decimal
    Percent,
    /// Two decimals
    Decimal,
    /// Nearest integer
    Round,
    /// Dollar amount with cents
    Currency,
    /// As is
    Plain,
}

impl DashboardData {
    /// Churn rate as a fraction
    ///
    /// Counts are turned into `Yes / (Yes + No)`; incomplete or all-zero
    /// counts give no rate.
    pub fn churn_rate_value(&self) -> Option<f64> {
        match self.churn_rate? {
            ChurnRate::Fraction(rate) => Some(rate),
            ChurnRate::Counts(YesNoCounts {
                yes: Some(yes),
                no: Some(no),
            }) if yes + no > 0.0 => Some(yes / (yes + no)),
            ChurnRate::Counts(_) => None,
        }
    }

    /// Retained and churned slices; empty when no distribution was reported
    pub fn distribution(&self) -> Vec<Slice> {
        let Some(counts) = self.churn_distribution else {
            return Vec::new();
        };

        let retained = counts.no.unwrap_or(0.0);
        let churned = counts.yes.unwrap_or(0.0);
        let total = retained + churned;
        let share = |v: f64| if total > 0.0 { v / total } else { 0.0 };

        vec![
            Slice {
                name: "Retained",
                value: retained,
                share: share(retained),
            },
            Slice {
                name: "Churned",
                value: churned,
                share: share(churned),
            },
        ]
    }

    /// Monthly trend, or the reference series when the backend sends none
    pub fn churn_trend_or_default(&self) -> Vec<TrendPoint> {
        self.churn_trend.clone().unwrap_or_else(default_churn_trend)
    }

    /// Churn reasons, or the reference breakdown when the backend sends none
    pub fn churn_reasons_or_default(&self) -> Vec<ChurnReason> {
        self.churn_reasons.clone().unwrap_or_else(default_churn_reasons)
    }

    /// The four headline numbers
    pub fn cards(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                label: "Total Customers",
                value: format_stat(self.total_customers, DisplayFormat::Round, None),
            },
            StatCard {
                label: "Churn Rate",
                value: format_stat(self.churn_rate_value(), DisplayFormat::Percent, Some("%")),
            },
            StatCard {
                label: "Avg. Tenure",
                value: format_stat(self.avg_tenure, DisplayFormat::Round, Some("mo")),
            },
            StatCard {
                label: "Avg. Monthly Charge",
                value: format_stat(self.avg_monthly_charge, DisplayFormat::Currency, None),
            },
        ]
    }
}

/// Render a summary number, or [`NOT_AVAILABLE`] when absent
///
/// Percent and decimal values drop trailing zeros (`26.50` shows as `26.5`).
/// The unit, if any, follows after a space.
pub fn format_stat(value: Option<f64>, format: DisplayFormat, unit: Option<&str>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };

    let body = match format {
        DisplayFormat::Percent => trim_decimals(format!("{:.1}", value * 100.0)),
        DisplayFormat::Decimal => trim_decimals(format!("{:.2}", value)),
        DisplayFormat::Round => format!("{}", value.round()),
        DisplayFormat::Currency => format!("${:.2}", value),
        DisplayFormat::Plain => format!("{}", value),
    };

    match unit {
        Some(unit) if !unit.is_empty() => format!("{} {}", body, unit),
        _ => body,
    }
}

fn trim_decimals(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

fn default_churn_trend() -> Vec<TrendPoint> {
    [
        ("Jan", 5.2),
        ("Feb", 5.8),
        ("Mar", 5.4),
        ("Apr", 5.9),
        ("May", 5.7),
        ("Jun", 6.1),
        ("Jul", 5.6),
        ("Aug", 5.3),
        ("Sep", 4.9),
        ("Oct", 4.8),
        ("Nov", 4.6),
        ("Dec", 4.5),
    ]
    .into_iter()
    .map(|(month, churn_rate)| TrendPoint {
        month: month.to_string(),
        churn_rate,
    })
    .collect()
}

fn default_churn_reasons() -> Vec<ChurnReason> {
    [
        ("Price", 38.0),
        ("Competitor", 25.0),
        ("Service Quality", 15.0),
        ("Coverage", 12.0),
        ("Moving", 7.0),
        ("Other", 3.0),
    ]
    .into_iter()
    .map(|(reason, percentage)| ChurnReason {
        reason: reason.to_string(),
        percentage,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND_JSON: &str = r#"{
        "total_customers": 7032,
        "churn_rate": 0.26578498293515357,
        "avg_tenure": 32.42178612059158,
        "avg_monthly_charge": 64.79820819112628,
        "active_customers": 5163,
        "churn_distribution": {"Yes": 1869, "No": 5163}
    }"#;

    #[test]
    fn test_deserialize_backend_payload() {
        let data: DashboardData = serde_json::from_str(BACKEND_JSON).unwrap();

        assert_eq!(data.total_customers, Some(7032.0));
        assert_eq!(data.churn_rate, Some(ChurnRate::Fraction(0.26578498293515357)));
        assert_eq!(data.churn_distribution.unwrap().yes, Some(1869.0));
        assert!(data.churn_trend.is_none());
    }

    #[test]
    fn test_churn_rate_from_counts() {
        let data: DashboardData =
            serde_json::from_str(r#"{"churn_rate": {"Yes": 25, "No": 75}}"#).unwrap();
        assert_eq!(data.churn_rate_value(), Some(0.25));

        let data: DashboardData =
            serde_json::from_str(r#"{"churn_rate": {"Yes": 0, "No": 0}}"#).unwrap();
        assert_eq!(data.churn_rate_value(), None);

        let data: DashboardData = serde_json::from_str(r#"{"churn_rate": {"Yes": 3}}"#).unwrap();
        assert_eq!(data.churn_rate_value(), None);

        assert_eq!(DashboardData::default().churn_rate_value(), None);
    }

    #[test]
    fn test_distribution_slices() {
        let data: DashboardData = serde_json::from_str(BACKEND_JSON).unwrap();
        let slices = data.distribution();

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].name, "Retained");
        assert_eq!(slices[0].value, 5163.0);
        assert_eq!(slices[1].name, "Churned");
        assert!((slices[0].share + slices[1].share - 1.0).abs() < 1e-12);

        assert!(DashboardData::default().distribution().is_empty());
    }

    #[test]
    fn test_distribution_missing_side_counts_as_zero() {
        let data: DashboardData =
            serde_json::from_str(r#"{"churn_distribution": {"Yes": 4}}"#).unwrap();
        let slices = data.distribution();
        assert_eq!(slices[0].value, 0.0);
        assert_eq!(slices[1].share, 1.0);
    }

    #[test]
    fn test_trend_and_reason_fallbacks() {
        let data = DashboardData::default();
        let trend = data.churn_trend_or_default();
        assert_eq!(trend.len(), 12);
        assert_eq!(trend[0].month, "Jan");
        assert_eq!(trend[11].churn_rate, 4.5);

        let reasons = data.churn_reasons_or_default();
        assert_eq!(reasons.len(), 6);
        assert_eq!(reasons.iter().map(|r| r.percentage).sum::<f64>(), 100.0);

        let data: DashboardData =
            serde_json::from_str(r#"{"churn_trend": [{"month": "Jan", "churnRate": 1.5}]}"#)
                .unwrap();
        assert_eq!(data.churn_trend_or_default().len(), 1);
    }

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(Some(0.265), DisplayFormat::Percent, Some("%")), "26.5 %");
        assert_eq!(format_stat(Some(0.27), DisplayFormat::Percent, None), "27");
        assert_eq!(format_stat(Some(3.14159), DisplayFormat::Decimal, None), "3.14");
        assert_eq!(format_stat(Some(2.5), DisplayFormat::Decimal, None), "2.5");
        assert_eq!(format_stat(Some(32.42), DisplayFormat::Round, Some("mo")), "32 mo");
        assert_eq!(format_stat(Some(64.798), DisplayFormat::Currency, None), "$64.80");
        assert_eq!(format_stat(Some(7032.0), DisplayFormat::Plain, None), "7032");
        assert_eq!(format_stat(None, DisplayFormat::Round, Some("mo")), NOT_AVAILABLE);
        assert_eq!(format_stat(Some(f64::NAN), DisplayFormat::Plain, None), NOT_AVAILABLE);
    }

    #[test]
    fn test_cards() {
        let data: DashboardData = serde_json::from_str(BACKEND_JSON).unwrap();
        let cards = data.cards();

        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].value, "7032");
        assert_eq!(cards[1].value, "26.6 %");
        assert_eq!(cards[2].value, "32 mo");
        assert_eq!(cards[3].value, "$64.80");
    }
}
