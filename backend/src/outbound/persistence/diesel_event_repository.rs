//! Diesel-backed event log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::events::RsvpEvent;
use crate::domain::ports::{EventRepository, EventRepositoryError};

use super::models::RsvpEventRow;
use super::pool::{DbPool, PoolError};
use super::schema::rsvp_events;

/// Event repository backed by PostgreSQL.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Build the repository around the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(err: PoolError) -> EventRepositoryError {
    debug!(error = %err, "event repository could not get a connection");
    EventRepositoryError::connection(err.to_string())
}

fn map_diesel_error(err: diesel::result::Error) -> EventRepositoryError {
    debug!(error = %err, "event repository query failed");
    EventRepositoryError::query(err.to_string())
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn record(&self, event: &RsvpEvent) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(rsvp_events::table)
            .values(RsvpEventRow::from(event))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn fetch_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<RsvpEvent>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = rsvp_events::table
            .select(RsvpEventRow::as_select())
            .into_boxed();
        if let Some(from) = from {
            query = query.filter(rsvp_events::created_at.ge(from));
        }
        if let Some(to) = to {
            query = query.filter(rsvp_events::created_at.le(to));
        }

        let rows = query
            .order(rsvp_events::created_at.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(RsvpEvent::from).collect())
    }
}
