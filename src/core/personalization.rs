use crate::models::{AlertLevel, AlertPreferenceResponse, AlertRecommendations, UserProfile};

/// AQI at which high-alert users are notified
pub const HIGH_ALERT_AQI_THRESHOLD: u32 = 50;

/// AQI at which everyone else is notified
pub const DEFAULT_AQI_THRESHOLD: u32 = 100;

/// Alert level for a profile. Age dominates medical flags.
pub fn alert_level_for(profile: &UserProfile) -> AlertLevel {
    if profile.is_elderly() {
        AlertLevel::High
    } else if profile.has_asthma() {
        AlertLevel::Medium
    } else {
        AlertLevel::Low
    }
}

/// Derive notification preferences from a user profile
pub fn recommend_alert_preference(profile: &UserProfile) -> AlertPreferenceResponse {
    let alert_level = alert_level_for(profile);

    let aqi_threshold = match alert_level {
        AlertLevel::High => HIGH_ALERT_AQI_THRESHOLD,
        AlertLevel::Medium | AlertLevel::Low => DEFAULT_AQI_THRESHOLD,
    };

    AlertPreferenceResponse {
        alert_level,
        recommendations: AlertRecommendations {
            aqi_threshold,
            push_notifications: true,
            email_notifications: matches!(alert_level, AlertLevel::Medium | AlertLevel::High),
        },
        explanation: format!("Alert level set to {} based on user profile", alert_level),
    }
}
