//! Song suggestions and their triage state.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::DomainError;

const MAX_SONG_LEN: usize = 200;

/// A song suggestion left through the music section of the invitation.
///
/// Suggestions live in their own table. They may be anonymous or, when the
/// visitor already registered, linked back to the guest row.
#[derive(Debug, Clone, PartialEq)]
pub struct SongSuggestion {
    /// Row identifier.
    pub id: Uuid,
    /// The suggested song text as typed, trimmed.
    pub song: String,
    /// Whether the couple has dealt with the suggestion.
    pub processed: bool,
    /// Linked guest, when the suggestion was not anonymous.
    pub guest_id: Option<Uuid>,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validate raw song text from the suggestion form.
///
/// Blank input and input over the length cap are rejected with a field
/// error keyed to `song`.
pub fn validate_song_text(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_field(
            "song",
            "missing required field: song",
        ));
    }
    if trimmed.chars().count() > MAX_SONG_LEN {
        return Err(DomainError::invalid_field(
            "song",
            format!("song must be at most {MAX_SONG_LEN} characters"),
        ));
    }
    Ok(trimmed.to_owned())
}

/// One entry in the admin song triage list.
///
/// The list merges dedicated suggestion rows with song requests typed into
/// the RSVP form, so both show up in one place for playlist building.
#[derive(Debug, Clone, PartialEq)]
pub struct SongTriageEntry {
    /// Identifier of the underlying row.
    pub id: Uuid,
    /// The song text.
    pub song: String,
    /// Triage state.
    pub processed: bool,
    /// Display name of the submitter, `None` for anonymous suggestions.
    pub submitted_by: Option<String>,
    /// Where the entry came from.
    pub source: SongSource,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

/// Origin of a song triage entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SongSource {
    /// A row in the suggestions table.
    Suggestion,
    /// The song request field of a guest's RSVP.
    GuestRequest,
}

/// Accepts song suggestions from the public music section.
#[derive(Clone)]
pub struct SongSuggestionService {
    suggestions: std::sync::Arc<dyn crate::domain::ports::SuggestionRepository>,
}

impl SongSuggestionService {
    /// Build the service around the suggestion repository.
    pub fn new(
        suggestions: std::sync::Arc<dyn crate::domain::ports::SuggestionRepository>,
    ) -> Self {
        Self { suggestions }
    }

    /// Validate and store one suggestion. Anonymous unless the caller
    /// supplies a guest link.
    pub async fn suggest(
        &self,
        song: &str,
        guest_id: Option<Uuid>,
    ) -> Result<Uuid, DomainError> {
        let suggestion = SongSuggestion {
            id: Uuid::new_v4(),
            song: validate_song_text(song)?,
            processed: false,
            guest_id,
            created_at: Utc::now(),
        };
        self.suggestions.insert(&suggestion).await.map_err(|err| {
            tracing::error!(error = %err, "suggestion write failed");
            DomainError::internal("could not store the suggestion")
        })?;
        Ok(suggestion.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{FixtureSuggestionRepository, MockSuggestionRepository};
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_song_text_is_rejected(#[case] raw: &str) {
        let err = validate_song_text(raw).expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], "song");
    }

    #[tokio::test]
    async fn suggestions_are_stored_unprocessed() {
        let mut repo = MockSuggestionRepository::new();
        repo.expect_insert()
            .withf(|s| !s.processed && s.song == "Paquito el Chocolatero")
            .times(1)
            .returning(|_| Ok(()));

        SongSuggestionService::new(Arc::new(repo))
            .suggest("  Paquito el Chocolatero ", None)
            .await
            .expect("stored");
    }

    #[tokio::test]
    async fn invalid_suggestions_never_reach_the_repository() {
        let service =
            SongSuggestionService::new(Arc::new(FixtureSuggestionRepository::default()));
        assert!(service.suggest("", None).await.is_err());
    }

    #[rstest]
    fn overlong_song_text_is_rejected() {
        let raw = "x".repeat(201);
        assert!(validate_song_text(&raw).is_err());
    }

    #[rstest]
    fn song_text_is_trimmed() {
        assert_eq!(
            validate_song_text("  Paquito el Chocolatero ").expect("valid"),
            "Paquito el Chocolatero"
        );
    }
}
