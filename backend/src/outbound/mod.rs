//! Outbound adapters: persistence and email delivery.

pub mod email;
pub mod persistence;
