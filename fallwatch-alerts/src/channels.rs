//! Reference channel implementations
//!
//! Real SMS, email, call and push backends are platform code and live with
//! the caller. [`LogChannel`] stands in for any of them where no backend is
//! wired up yet (dry runs, simulators, development builds): it renders the
//! alert and writes it to the log instead of delivering it.

use async_trait::async_trait;
use fallwatch_core::{EmergencyContact, FallEvent};
use log::info;

use crate::message::AlertMessage;
use crate::{ChannelError, ChannelKind, NotificationChannel};

/// Channel that logs the alert it would have sent
#[derive(Debug, Clone, Copy)]
pub struct LogChannel {
    kind: ChannelKind,
}

impl LogChannel {
    /// Log-only stand-in for `kind`
    pub const fn new(kind: ChannelKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl NotificationChannel for LogChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn send(&self, event: &FallEvent, contact: &EmergencyContact) -> Result<(), ChannelError> {
        let message = AlertMessage::compose(event);
        let unset = || ChannelError::InvalidRecipient(format!("no {} recipient", self.kind));

        match self.kind {
            ChannelKind::Sms => {
                let phone = contact.phone_number().ok_or_else(unset)?;
                info!("[sms] to {}: {}", phone, message.body);
            }
            ChannelKind::Call => {
                let phone = contact.phone_number().ok_or_else(unset)?;
                info!("[call] dialing {}", phone);
            }
            ChannelKind::Email => {
                let email = contact.email_address().ok_or_else(unset)?;
                info!("[email] to {} ({}): {}", email, message.subject, message.body);
            }
            ChannelKind::Push => {
                info!("[push] {}: {}", message.push_title, message.push_body);
            }
        }
        Ok(())
    }
}
