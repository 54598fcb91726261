//! Emergency Alert Dispatch for Confirmed Falls
//!
//! ## Overview
//!
//! When the detection core confirms a fall, someone has to be told. This
//! crate fans a [`FallEvent`] out to every configured
//! [`NotificationChannel`] at once and reports what happened on each.
//!
//! ## Channels
//!
//! | Channel | Needs                         | Typical backend          |
//! |---------|-------------------------------|--------------------------|
//! | SMS     | `EmergencyContact::phone_number` | carrier SMS API        |
//! | Email   | `EmergencyContact::email`     | SMTP relay               |
//! | Call    | `EmergencyContact::phone_number` | telephony intent / VoIP |
//! | Push    | nothing                       | local OS notification    |
//!
//! The crate does not implement any backend. Callers implement
//! [`NotificationChannel`] against their platform and hand the
//! implementations to the [`AlertDispatcher`].
//!
//! ## Delivery Semantics
//!
//! - **Independent**: each channel runs in its own task; a slow or failing
//!   channel never delays or hides another.
//! - **Best effort**: no retries and no dispatcher-imposed timeout. Timeout
//!   policy belongs to the channel implementation; retry policy belongs to
//!   the caller, who can re-dispatch to a narrower channel set.
//! - **Joined**: `dispatch` returns only after every channel task has
//!   finished, so no alert work outlives the call.
//! - **Explicit skips**: a channel whose contact field is missing is not
//!   attempted and is reported as `Skipped`, distinct from `Failed`.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use fallwatch_alerts::{
//!     AlertDispatcher, ChannelError, ChannelKind, NotificationChannel,
//! };
//! use fallwatch_core::{EmergencyContact, FallEvent};
//!
//! struct Sms;
//!
//! #[async_trait]
//! impl NotificationChannel for Sms {
//!     fn kind(&self) -> ChannelKind {
//!         ChannelKind::Sms
//!     }
//!
//!     async fn send(&self, _event: &FallEvent, _contact: &EmergencyContact) -> Result<(), ChannelError> {
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher = AlertDispatcher::new();
//! let channels: Vec<Arc<dyn NotificationChannel>> = vec![Arc::new(Sms)];
//! let event = FallEvent { timestamp: 0, last_known_location: None, trigger_magnitude: 30.0 };
//!
//! let report = dispatcher
//!     .dispatch(event, &EmergencyContact::phone("+15551234567"), &channels)
//!     .await;
//! assert!(report.all_delivered());
//! # }
//! ```

pub mod channels;
pub mod dispatcher;
pub mod message;
pub mod session;

// Re-export common types
pub use dispatcher::{AlertDispatcher, DeliveryOutcome, DispatchReport, DispatchResult, DispatchStats};
pub use message::AlertMessage;
pub use session::{
    Command, FallWatch, RuntimeClock, SessionError, SessionEvent, SessionHandle, SessionSummary,
};

use std::fmt;

use async_trait::async_trait;
use fallwatch_core::{EmergencyContact, FallEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delivery mechanism for an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Text message to the contact's phone
    Sms,
    /// Email to the contact's address
    Email,
    /// Voice call to the contact's phone
    Call,
    /// Local notification on the device itself
    Push,
}

impl ChannelKind {
    /// All channel kinds
    pub const ALL: [ChannelKind; 4] = [
        ChannelKind::Sms,
        ChannelKind::Email,
        ChannelKind::Call,
        ChannelKind::Push,
    ];

    /// Lowercase name for logs
    pub const fn name(&self) -> &'static str {
        match self {
            ChannelKind::Sms => "sms",
            ChannelKind::Email => "email",
            ChannelKind::Call => "call",
            ChannelKind::Push => "push",
        }
    }

    /// True when `contact` has the field this channel needs
    pub fn is_addressable(&self, contact: &EmergencyContact) -> bool {
        match self {
            ChannelKind::Sms | ChannelKind::Call => contact.phone_number().is_some(),
            ChannelKind::Email => contact.email_address().is_some(),
            ChannelKind::Push => true,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a single channel failed to deliver
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Channel unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Capability to deliver a fall alert over one medium
///
/// Implementations own their timeout policy. `send` is called at most
/// once per dispatch and only when the contact has the field
/// [`ChannelKind::is_addressable`] requires.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Which medium this channel delivers over
    fn kind(&self) -> ChannelKind;

    /// Deliver the alert
    async fn send(&self, event: &FallEvent, contact: &EmergencyContact) -> Result<(), ChannelError>;
}
