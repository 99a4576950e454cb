//! Diesel-backed guest repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::guest::Guest;
use crate::domain::ports::{GuestRepository, GuestRepositoryError};

use super::models::GuestRow;
use super::pool::{DbPool, PoolError};
use super::schema::guests;

/// Guest repository backed by PostgreSQL.
#[derive(Clone)]
pub struct DieselGuestRepository {
    pool: DbPool,
}

impl DieselGuestRepository {
    /// Build the repository around the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(err: PoolError) -> GuestRepositoryError {
    debug!(error = %err, "guest repository could not get a connection");
    GuestRepositoryError::connection(err.to_string())
}

fn map_diesel_error(err: diesel::result::Error) -> GuestRepositoryError {
    debug!(error = %err, "guest repository query failed");
    GuestRepositoryError::query(err.to_string())
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl GuestRepository for DieselGuestRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Guest>, GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = guests::table
            .filter(guests::email.eq(email))
            .select(GuestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Guest::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Guest, GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = guests::table
            .find(id)
            .select(GuestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Guest::from)
            .ok_or(GuestRepositoryError::NotFound { id })
    }

    async fn insert(&self, guest: &Guest) -> Result<(), GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(guests::table)
            .values(GuestRow::from(guest))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn update(&self, guest: &Guest) -> Result<(), GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(guests::table.find(guest.id))
            .set(GuestRow::from(guest))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if affected == 0 {
            return Err(GuestRepositoryError::NotFound { id: guest.id });
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Guest>, GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = guests::table
            .order((guests::last_name.asc(), guests::first_name.asc()))
            .select(GuestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Guest::from).collect())
    }

    async fn search_confirmed(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Guest>, GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = format!("%{}%", escape_like(query));

        let rows = guests::table
            .filter(guests::rsvp_status.eq(true))
            .filter(
                guests::first_name
                    .ilike(pattern.clone())
                    .or(guests::last_name.ilike(pattern)),
            )
            .order((guests::last_name.asc(), guests::first_name.asc()))
            .limit(limit)
            .select(GuestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Guest::from).collect())
    }

    async fn set_table(
        &self,
        id: Uuid,
        table_id: Option<i32>,
    ) -> Result<(), GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(guests::table.find(id))
            .set(guests::table_id.eq(table_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if affected == 0 {
            return Err(GuestRepositoryError::NotFound { id });
        }
        Ok(())
    }

    async fn set_song_processed(
        &self,
        id: Uuid,
        processed: bool,
    ) -> Result<(), GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(guests::table.find(id))
            .set(guests::song_processed.eq(processed))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if affected == 0 {
            return Err(GuestRepositoryError::NotFound { id });
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(guests::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if affected == 0 {
            return Err(GuestRepositoryError::NotFound { id });
        }
        Ok(())
    }
}
