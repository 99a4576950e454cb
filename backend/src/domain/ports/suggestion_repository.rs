//! Port for song suggestion persistence.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::song::SongSuggestion;

/// Errors raised by song suggestion repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestionRepositoryError {
    /// Repository connection could not be established.
    #[error("suggestion repository connection failed: {message}")]
    Connection {
        /// Adapter-specific failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("suggestion repository query failed: {message}")]
    Query {
        /// Adapter-specific failure detail.
        message: String,
    },
    /// No suggestion exists with the given id.
    #[error("song suggestion not found: {id}")]
    NotFound {
        /// The missing identifier.
        id: Uuid,
    },
}

impl SuggestionRepositoryError {
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

/// Port for song suggestion storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// Insert a new suggestion row.
    async fn insert(&self, suggestion: &SongSuggestion) -> Result<(), SuggestionRepositoryError>;

    /// Every suggestion, newest first.
    async fn list_all(&self) -> Result<Vec<SongSuggestion>, SuggestionRepositoryError>;

    /// Set a suggestion's processed flag, touching nothing else.
    async fn set_processed(
        &self,
        id: Uuid,
        processed: bool,
    ) -> Result<(), SuggestionRepositoryError>;
}

/// In-memory fixture; mutations persist so later reads observe them.
#[derive(Debug, Default)]
pub struct FixtureSuggestionRepository {
    suggestions: Mutex<Vec<SongSuggestion>>,
}

impl FixtureSuggestionRepository {
    /// Fixture seeded with the given rows.
    pub fn with_suggestions(suggestions: Vec<SongSuggestion>) -> Self {
        Self {
            suggestions: Mutex::new(suggestions),
        }
    }

    fn rows(&self) -> MutexGuard<'_, Vec<SongSuggestion>> {
        self.suggestions.lock().expect("suggestion fixture lock")
    }
}

#[async_trait]
impl SuggestionRepository for FixtureSuggestionRepository {
    async fn insert(&self, suggestion: &SongSuggestion) -> Result<(), SuggestionRepositoryError> {
        self.rows().push(suggestion.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<SongSuggestion>, SuggestionRepositoryError> {
        let mut rows = self.rows().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn set_processed(
        &self,
        id: Uuid,
        processed: bool,
    ) -> Result<(), SuggestionRepositoryError> {
        let mut rows = self.rows();
        match rows.iter_mut().find(|s| s.id == id) {
            Some(row) => {
                row.processed = processed;
                Ok(())
            }
            None => Err(SuggestionRepositoryError::NotFound { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn suggestion(song: &str, age: Duration) -> SongSuggestion {
        SongSuggestion {
            id: Uuid::new_v4(),
            song: song.to_owned(),
            processed: false,
            guest_id: None,
            created_at: Utc::now() - age,
        }
    }

    #[tokio::test]
    async fn fixture_lists_newest_first() {
        let repo = FixtureSuggestionRepository::with_suggestions(vec![
            suggestion("older", Duration::hours(2)),
            suggestion("newer", Duration::hours(1)),
        ]);

        let rows = repo.list_all().await.expect("list");
        assert_eq!(rows[0].song, "newer");
    }

    #[tokio::test]
    async fn fixture_set_processed_reports_unknown_ids() {
        let repo = FixtureSuggestionRepository::default();
        let id = Uuid::new_v4();

        let err = repo.set_processed(id, true).await.expect_err("missing");
        assert_eq!(err, SuggestionRepositoryError::NotFound { id });
    }

    #[tokio::test]
    async fn fixture_set_processed_flips_only_the_flag() {
        let seeded = suggestion("Thriller", Duration::hours(1));
        let id = seeded.id;
        let repo = FixtureSuggestionRepository::with_suggestions(vec![seeded.clone()]);

        repo.set_processed(id, true).await.expect("processed");

        let rows = repo.list_all().await.expect("list");
        assert!(rows[0].processed);
        assert_eq!(rows[0].song, seeded.song);
        assert_eq!(rows[0].created_at, seeded.created_at);
    }

    #[tokio::test]
    async fn fixture_inserts_show_up_in_listings() {
        let repo = FixtureSuggestionRepository::default();
        repo.insert(&suggestion("Vivaldi", Duration::zero()))
            .await
            .expect("insert");

        let rows = repo.list_all().await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].song, "Vivaldi");
    }
}
