//! Wedding invitation backend.
//!
//! A single-event service behind the couple's invitation site: RSVP
//! submissions, the seat finder, song suggestions, the admin dashboard
//! with CSV export and song triage, event analytics, and confirmation
//! email delivery.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
