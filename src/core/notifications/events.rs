//! Reminder events and their SMS text.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kinds of reminder event the relay knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    DoseDue,
    RefillReminder,
    TestReminder,
}

impl EventKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DoseDue => "DOSE_DUE",
            Self::RefillReminder => "REFILL_REMINDER",
            Self::TestReminder => "TEST_REMINDER",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "DOSE_DUE" => Ok(Self::DoseDue),
            "REFILL_REMINDER" => Ok(Self::RefillReminder),
            "TEST_REMINDER" => Ok(Self::TestReminder),
            other => Err(RenderError::UnknownEvent(other.to_string())),
        }
    }
}

/// A reminder event addressed to one recipient.
///
/// `payload` carries the template fields (`patientName`, `meds`, `time`).
/// The speech hints are only consulted when the event is also spoken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub event: EventKind,
    pub to: String,
    #[serde(default)]
    pub payload: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaking_rate: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl EventPayload {
    pub fn new(event: EventKind, to: impl Into<String>) -> Self {
        Self {
            event,
            to: to.into(),
            payload: HashMap::new(),
            voice: None,
            emotion: None,
            speaking_rate: None,
            prompt: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("missing 'to'")]
    MissingRecipient,

    #[error("missing payload field '{field}' for event {event}")]
    MissingField {
        field: &'static str,
        event: EventKind,
    },

    #[error("unknown event type '{0}'")]
    UnknownEvent(String),
}

fn require_field<'a>(
    payload: &'a HashMap<String, String>,
    field: &'static str,
    event: EventKind,
) -> Result<&'a str, RenderError> {
    payload
        .get(field)
        .filter(|v| !v.trim().is_empty())
        .map(String::as_str)
        .ok_or(RenderError::MissingField { field, event })
}

/// Render the SMS body for an event.
///
/// The recipient is checked before any template field.
pub fn render_body(event: &EventPayload) -> Result<String, RenderError> {
    if event.to.trim().is_empty() {
        return Err(RenderError::MissingRecipient);
    }

    let kind = event.event;
    match kind {
        EventKind::DoseDue => {
            let patient_name = require_field(&event.payload, "patientName", kind)?;
            let meds = require_field(&event.payload, "meds", kind)?;
            let time = require_field(&event.payload, "time", kind)?;
            Ok(format!(
                "Hi {patient_name}, this is your DoseDock reminder to take your {meds} at {time}."
            ))
        }
        EventKind::RefillReminder => {
            let patient_name = require_field(&event.payload, "patientName", kind)?;
            let meds = require_field(&event.payload, "meds", kind)?;
            Ok(format!(
                "Hi {patient_name}, your DoseDock dispenser is running low on {meds}. Please refill soon."
            ))
        }
        EventKind::TestReminder => Ok("DoseDock test reminder, notifications are working.".to_string()),
    }
}
