//! Service subscriptions shown on a customer profile

use super::CustomerProfile;
use serde::Serialize;

/// Whether the customer subscribes to one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub name: &'static str,
    pub active: bool,
}

/// The nine services, in display order
pub fn service_statuses(profile: &CustomerProfile) -> Vec<ServiceStatus> {
    let yes = |value: &str| value == "Yes";

    vec![
        ServiceStatus {
            name: "Phone Service",
            active: yes(&profile.phone_service),
        },
        ServiceStatus {
            name: "Multiple Lines",
            active: yes(&profile.multiple_lines),
        },
        ServiceStatus {
            name: "Internet Service",
            active: profile.has_internet(),
        },
        ServiceStatus {
            name: "Online Security",
            active: yes(&profile.online_security),
        },
        ServiceStatus {
            name: "Online Backup",
            active: yes(&profile.online_backup),
        },
        ServiceStatus {
            name: "Device Protection",
            active: yes(&profile.device_protection),
        },
        ServiceStatus {
            name: "Tech Support",
            active: yes(&profile.tech_support),
        },
        ServiceStatus {
            name: "Streaming TV",
            active: yes(&profile.streaming_tv),
        },
        ServiceStatus {
            name: "Streaming Movies",
            active: yes(&profile.streaming_movies),
        },
    ]
}
