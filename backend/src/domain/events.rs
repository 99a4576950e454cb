//! Analytics events recorded by the invitation site.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::DomainError;

const MAX_EVENT_TYPE_LEN: usize = 100;

/// Event types the aggregator understands.
///
/// The ingestion endpoint accepts any type string so new front-end
/// instrumentation never needs a backend deploy; unknown types land in
/// [`EventKind::Other`] and still appear in the per-type breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The RSVP form became visible.
    FormView,
    /// The visitor interacted with the form for the first time.
    FormStart,
    /// A submission reached the backend and passed validation.
    ConfirmationRequested,
    /// An attending confirmation email was sent.
    ConfirmEmailSent,
    /// A declining confirmation email was sent.
    DeclineEmailSent,
    /// A confirmation email failed to send.
    EmailFailed,
    /// The gift IBAN was copied.
    IbanCopy,
    /// The hotel information block was opened.
    HotelInfo,
    /// Any event type the aggregator has no dedicated counter for.
    Other(String),
}

impl EventKind {
    /// The wire name of this event type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FormView => "rsvp_form_view",
            Self::FormStart => "rsvp_form_start",
            Self::ConfirmationRequested => "rsvp_confirmation_requested",
            Self::ConfirmEmailSent => "rsvp_confirm_email_sent",
            Self::DeclineEmailSent => "rsvp_decline_email_sent",
            Self::EmailFailed => "rsvp_email_failed",
            Self::IbanCopy => "iban_copy_click",
            Self::HotelInfo => "hotel_info_click",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Classify a wire event type string.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "rsvp_form_view" => Self::FormView,
            "rsvp_form_start" => Self::FormStart,
            "rsvp_confirmation_requested" => Self::ConfirmationRequested,
            "rsvp_confirm_email_sent" => Self::ConfirmEmailSent,
            "rsvp_decline_email_sent" => Self::DeclineEmailSent,
            "rsvp_email_failed" => Self::EmailFailed,
            "iban_copy_click" => Self::IbanCopy,
            "hotel_info_click" => Self::HotelInfo,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded analytics event.
#[derive(Debug, Clone, PartialEq)]
pub struct RsvpEvent {
    /// Row identifier.
    pub id: Uuid,
    /// Wire event type.
    pub event_type: String,
    /// Attendance flag, only meaningful on confirmation-requested events.
    pub rsvp_status: Option<bool>,
    /// Free-form metadata recorded with the event.
    pub metadata: Option<Value>,
    /// When the event happened.
    pub created_at: DateTime<Utc>,
}

impl RsvpEvent {
    /// Classified event kind.
    pub fn kind(&self) -> EventKind {
        EventKind::from_wire(&self.event_type)
    }

    /// String-valued metadata key lookup.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key).and_then(Value::as_str)
    }

    /// The attendance flag attached to the event.
    ///
    /// Prefers the dedicated column; falls back to metadata, where older
    /// site builds recorded the flag, sometimes as the string "true" rather
    /// than a JSON boolean.
    pub fn attendance_flag(&self) -> Option<bool> {
        if let Some(flag) = self.rsvp_status {
            return Some(flag);
        }
        match self.metadata.as_ref()?.get("rsvp_status")? {
            Value::Bool(flag) => Some(*flag),
            Value::String(s) => Some(s == "true"),
            _ => None,
        }
    }
}

/// Validate a raw event type string from the ingestion endpoint.
pub fn validate_event_type(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_field(
            "eventType",
            "missing required field: eventType",
        ));
    }
    if trimmed.chars().count() > MAX_EVENT_TYPE_LEN {
        return Err(DomainError::invalid_field(
            "eventType",
            format!("eventType must be at most {MAX_EVENT_TYPE_LEN} characters"),
        ));
    }
    Ok(trimmed.to_owned())
}
