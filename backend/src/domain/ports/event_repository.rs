//! Port for analytics event persistence.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::events::RsvpEvent;

/// Errors raised by event repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventRepositoryError {
    /// Repository connection could not be established.
    #[error("event repository connection failed: {message}")]
    Connection {
        /// Adapter-specific failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("event repository query failed: {message}")]
    Query {
        /// Adapter-specific failure detail.
        message: String,
    },
}

impl EventRepositoryError {
    /// Connection failure with the given detail.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query failure with the given detail.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for the append-only event log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Append an event row.
    async fn record(&self, event: &RsvpEvent) -> Result<(), EventRepositoryError>;

    /// Events within the inclusive bounds, ordered by `created_at`
    /// ascending. `None` bounds are open.
    async fn fetch_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<RsvpEvent>, EventRepositoryError>;
}

/// In-memory fixture; recorded events show up in later range fetches.
#[derive(Debug, Default)]
pub struct FixtureEventRepository {
    events: Mutex<Vec<RsvpEvent>>,
}

impl FixtureEventRepository {
    /// Fixture seeded with the given events.
    pub fn with_events(events: Vec<RsvpEvent>) -> Self {
        Self {
            events: Mutex::new(events),
        }
    }

    fn rows(&self) -> MutexGuard<'_, Vec<RsvpEvent>> {
        self.events.lock().expect("event fixture lock")
    }
}

#[async_trait]
impl EventRepository for FixtureEventRepository {
    async fn record(&self, event: &RsvpEvent) -> Result<(), EventRepositoryError> {
        self.rows().push(event.clone());
        Ok(())
    }

    async fn fetch_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<RsvpEvent>, EventRepositoryError> {
        let mut rows: Vec<RsvpEvent> = self
            .rows()
            .iter()
            .filter(|e| from.is_none_or(|f| e.created_at >= f))
            .filter(|e| to.is_none_or(|t| e.created_at <= t))
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.created_at);
        Ok(rows)
    }
}
