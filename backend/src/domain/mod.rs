//! Domain layer: entities, validation, services, and ports.
//!
//! Nothing in this module knows about HTTP or PostgreSQL. Inbound adapters
//! call the services; outbound adapters implement the ports.

pub mod admin;
pub mod analytics;
pub mod email;
mod error;
pub mod events;
pub mod export;
pub mod guest;
mod language;
pub mod ports;
pub mod rsvp;
pub mod seating;
pub mod song;

pub use error::{DomainError, ErrorCode};
pub use language::{Language, UnsupportedLanguage};
