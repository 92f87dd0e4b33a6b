//! Notification rendering and delivery.
//!
//! - `events` - Typed reminder events and the text renderer
//! - `types` - Channel, request and error types plus the `Notifier` trait
//! - `twilio` - SMS delivery through the Twilio Messages API

pub mod events;
pub mod twilio;
pub mod types;

pub use events::{EventKind, EventPayload, RenderError, render_body};
pub use twilio::{TWILIO_API_BASE_URL, TwilioConfig, TwilioSmsNotifier};
pub use types::{Channel, NotificationError, NotificationRequest, NotificationResult, Notifier};
