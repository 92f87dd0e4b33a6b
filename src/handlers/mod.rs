//! HTTP request handlers
//!
//! This module organizes all API handlers into logical groups:
//! - `api` - Health check endpoint
//! - `sms` - Plain SMS relay
//! - `events` - Reminder events rendered to SMS (and speech)
//! - `speak` - Text-to-speech REST API
//! - `twilio` - Twilio delivery status callbacks
//! - `error` - Failure responses shared by the handlers

pub mod api;
pub mod error;
pub mod events;
pub mod sms;
pub mod speak;
pub mod twilio;

pub use error::{ApiError, ApiResult};
