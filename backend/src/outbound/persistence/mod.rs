//! PostgreSQL persistence adapters built on Diesel.

mod diesel_event_repository;
mod diesel_guest_repository;
mod diesel_suggestion_repository;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_event_repository::DieselEventRepository;
pub use diesel_guest_repository::DieselGuestRepository;
pub use diesel_suggestion_repository::DieselSuggestionRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
