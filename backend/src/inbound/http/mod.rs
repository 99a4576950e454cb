//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod analytics;
pub mod email;
pub mod error;
pub mod events;
pub mod health;
pub mod rsvp;
pub mod seating;
pub mod session;
pub mod songs;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
