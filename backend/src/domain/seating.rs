//! Seat finder for confirmed guests.

use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::domain::guest::Guest;
use crate::domain::ports::GuestRepository;
use crate::domain::DomainError;

/// Matches are capped so a single-letter query cannot dump the guest list.
const SEARCH_LIMIT: i64 = 20;

/// A seat search candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatCandidate {
    /// Guest row identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Surname.
    pub last_name: String,
    /// Assigned table, `None` when seating has not been decided yet.
    pub table_id: Option<i32>,
}

impl From<&Guest> for SeatCandidate {
    fn from(guest: &Guest) -> Self {
        Self {
            id: guest.id,
            first_name: guest.first_name.clone(),
            last_name: guest.last_name.clone(),
            table_id: guest.table_id,
        }
    }
}

/// Outcome of a seat search.
///
/// `Multiple` carries every candidate's table so the client can resolve the
/// ambiguity without a second request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatSearchOutcome {
    /// No confirmed guest matched.
    NotFound,
    /// Exactly one match.
    Single(SeatCandidate),
    /// Several matches for the visitor to pick from.
    Multiple(Vec<SeatCandidate>),
}

/// Looks up table assignments for confirmed guests.
#[derive(Clone)]
pub struct SeatFinderService {
    guests: Arc<dyn GuestRepository>,
}

impl SeatFinderService {
    /// Build the service around the guest repository.
    pub fn new(guests: Arc<dyn GuestRepository>) -> Self {
        Self { guests }
    }

    /// Search confirmed guests by partial first or last name.
    pub async fn find(&self, query: &str) -> Result<SeatSearchOutcome, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::invalid_field(
                "q",
                "search query must not be empty",
            ));
        }

        let mut matches = self
            .guests
            .search_confirmed(query, SEARCH_LIMIT)
            .await
            .map_err(|err| {
                error!(error = %err, "seat search failed");
                DomainError::internal("could not search the guest list")
            })?;

        Ok(match matches.len() {
            0 => SeatSearchOutcome::NotFound,
            1 => SeatSearchOutcome::Single(SeatCandidate::from(&matches.remove(0))),
            _ => SeatSearchOutcome::Multiple(
                matches.iter().map(SeatCandidate::from).collect(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::guest::fixtures::confirmed_guest;
    use crate::domain::ports::{FixtureGuestRepository, MockGuestRepository};
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn blank_queries_are_rejected_before_any_lookup(#[case] query: &str) {
        let service = SeatFinderService::new(Arc::new(MockGuestRepository::new()));

        let err = service.find(query).await.expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], "q");
    }

    #[tokio::test]
    async fn no_match_reports_not_found() {
        let service = SeatFinderService::new(Arc::new(FixtureGuestRepository::default()));

        let outcome = service.find("garcía").await.expect("searched");
        assert_eq!(outcome, SeatSearchOutcome::NotFound);
    }

    #[tokio::test]
    async fn single_match_surfaces_an_unassigned_table_as_none() {
        let guest = confirmed_guest("María", "García", None);
        let service = SeatFinderService::new(Arc::new(FixtureGuestRepository::with_guests(
            vec![guest.clone()],
        )));

        let outcome = service.find("gar").await.expect("searched");
        match outcome {
            SeatSearchOutcome::Single(candidate) => {
                assert_eq!(candidate.id, guest.id);
                assert_eq!(candidate.table_id, None);
            }
            other => panic!("expected single, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn multiple_matches_carry_each_candidates_table() {
        let service = SeatFinderService::new(Arc::new(FixtureGuestRepository::with_guests(vec![
            confirmed_guest("María", "García", Some(3)),
            confirmed_guest("Mario", "Garrido", Some(7)),
        ])));

        let outcome = service.find("mar").await.expect("searched");
        match outcome {
            SeatSearchOutcome::Multiple(candidates) => {
                assert_eq!(candidates.len(), 2);
                let tables: Vec<_> = candidates.iter().map(|c| c.table_id).collect();
                assert!(tables.contains(&Some(3)));
                assert!(tables.contains(&Some(7)));
            }
            other => panic!("expected multiple, got {other:?}"),
        }
    }
}
