//! Diesel-backed song suggestion repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{SuggestionRepository, SuggestionRepositoryError};
use crate::domain::song::SongSuggestion;

use super::models::SongSuggestionRow;
use super::pool::{DbPool, PoolError};
use super::schema::song_suggestions;

/// Song suggestion repository backed by PostgreSQL.
#[derive(Clone)]
pub struct DieselSuggestionRepository {
    pool: DbPool,
}

impl DieselSuggestionRepository {
    /// Build the repository around the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(err: PoolError) -> SuggestionRepositoryError {
    debug!(error = %err, "suggestion repository could not get a connection");
    SuggestionRepositoryError::connection(err.to_string())
}

fn map_diesel_error(err: diesel::result::Error) -> SuggestionRepositoryError {
    debug!(error = %err, "suggestion repository query failed");
    SuggestionRepositoryError::query(err.to_string())
}

#[async_trait]
impl SuggestionRepository for DieselSuggestionRepository {
    async fn insert(&self, suggestion: &SongSuggestion) -> Result<(), SuggestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(song_suggestions::table)
            .values(SongSuggestionRow::from(suggestion))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<SongSuggestion>, SuggestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = song_suggestions::table
            .order(song_suggestions::created_at.desc())
            .select(SongSuggestionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(SongSuggestion::from).collect())
    }

    async fn set_processed(
        &self,
        id: Uuid,
        processed: bool,
    ) -> Result<(), SuggestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(song_suggestions::table.find(id))
            .set(song_suggestions::processed.eq(processed))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if affected == 0 {
            return Err(SuggestionRepositoryError::NotFound { id });
        }
        Ok(())
    }
}
