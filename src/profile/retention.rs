//! Retention offer catalog
//!
//! Offers are recommended only for customers labelled as churned.

use super::CustomerProfile;
use serde::Serialize;

/// A retention offer with its historical acceptance rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetentionOffer {
    pub title: &'static str,
    pub description: &'static str,
    /// Percentage of targeted customers who stayed
    pub success_rate: u8,
}

pub const RETENTION_OFFERS: &[RetentionOffer] = &[
    RetentionOffer {
        title: "Long-Term Discount",
        description: "10-20% off for a 12-month contract.",
        success_rate: 81,
    },
    RetentionOffer {
        title: "Low Tenure Retention",
        description: "15% discount for 3 months for new users.",
        success_rate: 73,
    },
    RetentionOffer {
        title: "High Monthly Spender",
        description: "Cashback or loyalty points for premium spenders.",
        success_rate: 77,
    },
    RetentionOffer {
        title: "Premium Security Package",
        description: "3 months free Online Security/Tech Support.",
        success_rate: 69,
    },
    RetentionOffer {
        title: "Streaming Bundle",
        description: "Free 2-month streaming subscription.",
        success_rate: 74,
    },
    RetentionOffer {
        title: "Unlimited Phone Plan",
        description: "50% discount on an additional line.",
        success_rate: 67,
    },
    RetentionOffer {
        title: "Month-to-Month Offer",
        description: "Free upgrade for switching to a 1-year contract.",
        success_rate: 70,
    },
    RetentionOffer {
        title: "Auto-Pay Incentive",
        description: "$5/month discount for switching to auto-pay.",
        success_rate: 66,
    },
    RetentionOffer {
        title: "High Churn Risk",
        description: "Loyalty bonuses or priority customer support.",
        success_rate: 78,
    },
    RetentionOffer {
        title: "Low Engagement Offer",
        description: "Free trials for Tech Support/Device Protection.",
        success_rate: 71,
    },
    RetentionOffer {
        title: "Senior Citizen Discount",
        description: "5% off total bills for senior citizens.",
        success_rate: 72,
    },
    RetentionOffer {
        title: "Family & Dependents Bundle",
        description: "Discounted additional family lines.",
        success_rate: 75,
    },
];

/// Offers to show for a customer; empty unless the customer churned
pub fn recommended_offers(profile: &CustomerProfile) -> &'static [RetentionOffer] {
    if profile.has_churned() {
        RETENTION_OFFERS
    } else {
        &[]
    }
}
