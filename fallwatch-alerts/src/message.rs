//! Alert text shared by all channels

use fallwatch_core::FallEvent;

/// Text used in place of a location when none was attached
pub const LOCATION_UNAVAILABLE: &str = "Location not available";

/// Subject line for email alerts
pub const EMAIL_SUBJECT: &str = "Emergency: Fall Detected";

/// Title of the local push notification
pub const PUSH_TITLE: &str = "Fall Detected";

/// Body of the local push notification
pub const PUSH_BODY: &str = "A fall has been confirmed. Your emergency contact is being alerted.";

/// Rendered alert for one fall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// Email subject
    pub subject: String,
    /// Text for SMS and email bodies
    pub body: String,
    /// Push notification title
    pub push_title: String,
    /// Push notification body
    pub push_body: String,
}

impl AlertMessage {
    /// Render the alert text for `event`
    pub fn compose(event: &FallEvent) -> Self {
        let location = event.location().unwrap_or(LOCATION_UNAVAILABLE);
        Self {
            subject: EMAIL_SUBJECT.to_string(),
            body: format!(
                "Warning: A possible fall has been detected. Location: {}",
                location
            ),
            push_title: PUSH_TITLE.to_string(),
            push_body: PUSH_BODY.to_string(),
        }
    }
}
