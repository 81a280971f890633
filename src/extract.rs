//! Chat Response Extraction
//!
//! Picks the part of a support-bot answer the user actually asked about.
//! The bot answers with "Label: value, Label: value." text; when the question
//! mentions a known keyword, only that label's value is shown.

use regex::Regex;

/// Shown when the question names a label the answer does not contain
pub const NO_RELEVANT_INFO: &str = "No relevant information found.";

/// Keyword to label prefix, in priority order
///
/// The first keyword found in the question wins, even if a later one also
/// matches.
pub const KEYWORD_LABELS: &[(&str, &str)] = &[
    ("offer", "offer:"),
    ("charges", "monthly charges:"),
    ("tenure", "tenure:"),
    ("contract", "contract:"),
    ("payment method", "payment method:"),
];

/// Label prefix selected by a question, if any
pub fn select_label(query: &str) -> Option<&'static str> {
    let query = query.to_lowercase();
    KEYWORD_LABELS
        .iter()
        .find(|(keyword, _)| query.contains(keyword))
        .map(|(_, label)| *label)
}

/// Extract the relevant part of `response_text` for `query`
///
/// - No keyword in the query: the full response, unchanged.
/// - Keyword found: the trimmed text after its label, up to the next comma
///   or period. Matching runs on the lowercased response, so the value comes
///   back lowercased. A period directly followed by a digit is a decimal
///   point and stays part of the value.
/// - Label not in the response: [`NO_RELEVANT_INFO`].
pub fn extract(query: &str, response_text: &str) -> String {
    let Some(label) = select_label(query) else {
        return response_text.to_string();
    };

    let pattern = format!(r"{}((?:[^,.]|\.[0-9])+)", regex::escape(label));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(label, error = %e, "Failed to build extraction pattern");
            return NO_RELEVANT_INFO.to_string();
        }
    };

    let text = response_text.to_lowercase();
    re.captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NO_RELEVANT_INFO.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_charges() {
        assert_eq!(
            extract(
                "What's the monthly charges?",
                "Monthly Charges: 70.35, Contract: One year"
            ),
            "70.35"
        );
    }

    #[test]
    fn test_table_order_wins() {
        assert_eq!(
            extract(
                "tell me about tenure and contract",
                "Tenure: 12 months, Contract: One year"
            ),
            "12 months"
        );
        assert_eq!(select_label("tenure and payment method"), Some("tenure:"));
        assert_eq!(select_label("payment method and tenure"), Some("tenure:"));
    }

    #[test]
    fn test_no_keyword_returns_full_response() {
        assert_eq!(
            extract("hello", "Monthly Charges: 70.35"),
            "Monthly Charges: 70.35"
        );
        assert_eq!(select_label("hello"), None);
    }

    #[test]
    fn test_label_missing_from_response() {
        assert_eq!(extract("offer", "No offer information here"), NO_RELEVANT_INFO);
    }

    #[test]
    fn test_query_case_is_ignored() {
        assert_eq!(
            extract("Which CONTRACT is it?", "contract: Two year. Tenure: 70"),
            "two year"
        );
    }

    #[test]
    fn test_capture_stops_at_comma_or_period() {
        assert_eq!(
            extract("payment method please", "Payment Method: Electronic check. Churn: Yes"),
            "electronic check"
        );
        assert_eq!(
            extract("charges", "Monthly Charges: 70. Total: 844.2"),
            "70"
        );
    }

    #[test]
    fn test_decimal_point_is_kept() {
        assert_eq!(
            extract("monthly charges?", "Monthly Charges: 104.80"),
            "104.80"
        );
    }

    #[test]
    fn test_label_without_value_is_not_found() {
        assert_eq!(extract("tenure", "Tenure:, Contract: One year"), NO_RELEVANT_INFO);
    }

    #[test]
    fn test_offer_extraction() {
        assert_eq!(
            extract(
                "is there an offer for me?",
                "Customer 7590-VHVEG. Offer: 15% discount for 3 months, Churn risk: high"
            ),
            "15% discount for 3 months"
        );
    }

    #[test]
    fn test_value_is_lowercased() {
        assert_eq!(
            extract("which contract?", "Contract: One year, Tenure: 5"),
            "one year"
        );
    }
}
