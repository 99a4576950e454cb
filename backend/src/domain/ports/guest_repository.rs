//! Port for guest persistence.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::guest::Guest;

/// Errors raised by guest repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuestRepositoryError {
    /// Repository connection could not be established.
    #[error("guest repository connection failed: {message}")]
    Connection {
        /// Adapter-specific failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("guest repository query failed: {message}")]
    Query {
        /// Adapter-specific failure detail.
        message: String,
    },
    /// No guest exists with the given id.
    #[error("guest not found: {id}")]
    NotFound {
        /// The missing identifier.
        id: Uuid,
    },
}

impl GuestRepositoryError {
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

/// Port for guest storage and retrieval.
///
/// The RSVP flow addresses guests by email; admin operations address them
/// by id. Mutations that target an id return [`GuestRepositoryError::NotFound`]
/// when no row matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestRepository: Send + Sync {
    /// Fetch a guest by email, `None` when no row matches.
    async fn find_by_email(&self, email: &str) -> Result<Option<Guest>, GuestRepositoryError>;

    /// Fetch a guest by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Guest, GuestRepositoryError>;

    /// Insert a new guest row.
    async fn insert(&self, guest: &Guest) -> Result<(), GuestRepositoryError>;

    /// Overwrite an existing guest row, matching on id.
    async fn update(&self, guest: &Guest) -> Result<(), GuestRepositoryError>;

    /// Every guest, ordered by surname then first name.
    async fn list_all(&self) -> Result<Vec<Guest>, GuestRepositoryError>;

    /// Confirmed guests whose first or last name contains `query`,
    /// case-insensitively, capped at `limit` rows.
    async fn search_confirmed(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Guest>, GuestRepositoryError>;

    /// Assign or clear a guest's table.
    async fn set_table(&self, id: Uuid, table_id: Option<i32>)
        -> Result<(), GuestRepositoryError>;

    /// Set a guest's song-processed flag, touching nothing else.
    async fn set_song_processed(
        &self,
        id: Uuid,
        processed: bool,
    ) -> Result<(), GuestRepositoryError>;

    /// Delete a guest row.
    async fn delete(&self, id: Uuid) -> Result<(), GuestRepositoryError>;
}

/// In-memory fixture holding a fixed guest list.
///
/// Lookups and searches run against the seeded rows; mutations persist so
/// later reads observe them. Use it in tests where a handful of known rows
/// is enough.
#[derive(Debug, Default)]
pub struct FixtureGuestRepository {
    guests: Mutex<Vec<Guest>>,
}

impl FixtureGuestRepository {
    /// Fixture seeded with the given rows.
    pub fn with_guests(guests: Vec<Guest>) -> Self {
        Self {
            guests: Mutex::new(guests),
        }
    }

    fn rows(&self) -> MutexGuard<'_, Vec<Guest>> {
        self.guests.lock().expect("guest fixture lock")
    }

    fn mutate(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut Guest),
    ) -> Result<(), GuestRepositoryError> {
        let mut rows = self.rows();
        match rows.iter_mut().find(|g| g.id == id) {
            Some(row) => {
                apply(row);
                Ok(())
            }
            None => Err(GuestRepositoryError::NotFound { id }),
        }
    }
}

#[async_trait]
impl GuestRepository for FixtureGuestRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Guest>, GuestRepositoryError> {
        Ok(self.rows().iter().find(|g| g.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Guest, GuestRepositoryError> {
        self.rows()
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(GuestRepositoryError::NotFound { id })
    }

    async fn insert(&self, guest: &Guest) -> Result<(), GuestRepositoryError> {
        self.rows().push(guest.clone());
        Ok(())
    }

    async fn update(&self, guest: &Guest) -> Result<(), GuestRepositoryError> {
        self.mutate(guest.id, |row| *row = guest.clone())
    }

    async fn list_all(&self) -> Result<Vec<Guest>, GuestRepositoryError> {
        let mut rows = self.rows().clone();
        rows.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(rows)
    }

    async fn search_confirmed(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Guest>, GuestRepositoryError> {
        let needle = query.to_lowercase();
        Ok(self
            .rows()
            .iter()
            .filter(|g| g.rsvp_status == Some(true))
            .filter(|g| {
                g.first_name.to_lowercase().contains(&needle)
                    || g.last_name.to_lowercase().contains(&needle)
            })
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn set_table(
        &self,
        id: Uuid,
        table_id: Option<i32>,
    ) -> Result<(), GuestRepositoryError> {
        self.mutate(id, |row| row.table_id = table_id)
    }

    async fn set_song_processed(
        &self,
        id: Uuid,
        processed: bool,
    ) -> Result<(), GuestRepositoryError> {
        self.mutate(id, |row| row.song_processed = processed)
    }

    async fn delete(&self, id: Uuid) -> Result<(), GuestRepositoryError> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|g| g.id != id);
        if rows.len() == before {
            Err(GuestRepositoryError::NotFound { id })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::guest::fixtures::confirmed_guest;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_search_is_case_insensitive_and_confirmed_only() {
        let mut pending = confirmed_guest("Marta", "Ruiz", None);
        pending.rsvp_status = None;
        let repo = FixtureGuestRepository::with_guests(vec![
            confirmed_guest("María", "García", Some(1)),
            pending,
        ]);

        let hits = repo.search_confirmed("gar", 20).await.expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].last_name, "García");

        let misses = repo.search_confirmed("ruiz", 20).await.expect("search");
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn fixture_mutations_against_unknown_ids_are_not_found() {
        let repo = FixtureGuestRepository::default();
        let id = Uuid::new_v4();

        let err = repo.delete(id).await.expect_err("missing row");
        assert_eq!(err, GuestRepositoryError::NotFound { id });
    }

    #[tokio::test]
    async fn fixture_mutations_persist_across_reads() {
        let guest = confirmed_guest("María", "García", None);
        let id = guest.id;
        let repo = FixtureGuestRepository::with_guests(vec![guest]);

        repo.set_table(id, Some(7)).await.expect("assign table");
        assert_eq!(repo.find_by_id(id).await.expect("found").table_id, Some(7));

        repo.delete(id).await.expect("delete");
        assert!(repo.list_all().await.expect("list").is_empty());
    }

    #[rstest]
    fn query_error_formats_with_its_detail() {
        let err = GuestRepositoryError::query("timeout");
        assert!(err.to_string().contains("timeout"));
    }
}
