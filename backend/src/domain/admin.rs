//! Admin operations: guest management, song triage, and access control.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::export;
use crate::domain::guest::{Guest, RsvpSubmission};
use crate::domain::ports::{
    GuestRepository, GuestRepositoryError, SuggestionRepository, SuggestionRepositoryError,
};
use crate::domain::song::{SongSource, SongTriageEntry};
use crate::domain::{DomainError, Language};

/// Headline counters for the admin dashboard, computed over real guests
/// only (legacy anonymous suggestion rows are excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct GuestMetrics {
    /// All guest rows.
    pub total: u64,
    /// Guests with `rsvp_status == true`.
    pub confirmed: u64,
    /// Guests still pending or declined.
    pub pending: u64,
    /// Guests with non-blank dietary notes.
    pub dietary: u64,
}

impl GuestMetrics {
    /// Compute counters over a guest list.
    pub fn over(guests: &[Guest]) -> Self {
        let mut metrics = Self::default();
        for guest in guests.iter().filter(|g| !g.is_anonymous_suggestion()) {
            metrics.total += 1;
            if guest.rsvp_status == Some(true) {
                metrics.confirmed += 1;
            } else {
                metrics.pending += 1;
            }
            if guest.has_dietary_notes() {
                metrics.dietary += 1;
            }
        }
        metrics
    }
}

/// A manually added guest, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewGuest {
    /// Given name.
    pub first_name: String,
    /// Surname.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Pre-set confirmation, `None` leaves the guest pending.
    pub confirmed: Option<bool>,
    /// Dietary text.
    pub dietary_reqs: Option<String>,
    /// Language, defaults to Spanish.
    pub language: Language,
}

/// Song triage lists split by processed state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongTriage {
    /// Suggestions still to be dealt with.
    pub pending: Vec<SongTriageEntry>,
    /// Suggestions already on the playlist.
    pub added: Vec<SongTriageEntry>,
}

/// Guest management and song triage behind the admin session.
#[derive(Clone)]
pub struct GuestAdminService {
    guests: Arc<dyn GuestRepository>,
    suggestions: Arc<dyn SuggestionRepository>,
}

impl GuestAdminService {
    /// Build the service around its repositories.
    pub fn new(
        guests: Arc<dyn GuestRepository>,
        suggestions: Arc<dyn SuggestionRepository>,
    ) -> Self {
        Self {
            guests,
            suggestions,
        }
    }

    /// The full guest list, sorted by surname, with dashboard counters.
    pub async fn overview(&self) -> Result<(Vec<Guest>, GuestMetrics), DomainError> {
        let guests = self.guests.list_all().await.map_err(guest_error)?;
        let metrics = GuestMetrics::over(&guests);
        Ok((guests, metrics))
    }

    /// Add a guest by hand. Reuses the RSVP validation rules; the optional
    /// confirmed flag pre-sets attendance without clearing anything.
    pub async fn add_guest(&self, new_guest: NewGuest) -> Result<Uuid, DomainError> {
        // Validated as attending so the dietary text survives; the real
        // status is applied afterwards.
        let valid = RsvpSubmission {
            first_name: new_guest.first_name,
            last_name: new_guest.last_name,
            email: new_guest.email,
            attending: Some(true),
            dietary_reqs: new_guest.dietary_reqs,
            language: new_guest.language,
            ..RsvpSubmission::default()
        }
        .validate()?;

        let mut guest = valid.into_new_guest(Uuid::new_v4(), Utc::now());
        guest.rsvp_status = new_guest.confirmed;

        if self
            .guests
            .find_by_email(&guest.email)
            .await
            .map_err(guest_error)?
            .is_some()
        {
            return Err(DomainError::invalid_field(
                "email",
                "a guest with this email already exists",
            ));
        }
        self.guests.insert(&guest).await.map_err(guest_error)?;
        Ok(guest.id)
    }

    /// Assign or clear a guest's table.
    pub async fn set_table(&self, id: Uuid, table_id: Option<i32>) -> Result<(), DomainError> {
        self.guests
            .set_table(id, table_id)
            .await
            .map_err(guest_error)
    }

    /// Delete a guest.
    pub async fn delete_guest(&self, id: Uuid) -> Result<(), DomainError> {
        self.guests.delete(id).await.map_err(guest_error)
    }

    /// Flip the processed flag on a guest's song request.
    pub async fn set_guest_song_processed(
        &self,
        id: Uuid,
        processed: bool,
    ) -> Result<(), DomainError> {
        self.guests
            .set_song_processed(id, processed)
            .await
            .map_err(guest_error)
    }

    /// Flip the processed flag on an anonymous suggestion.
    pub async fn set_suggestion_processed(
        &self,
        id: Uuid,
        processed: bool,
    ) -> Result<(), DomainError> {
        self.suggestions
            .set_processed(id, processed)
            .await
            .map_err(suggestion_error)
    }

    /// Render the guest list as CSV for download.
    pub async fn export_csv(&self) -> Result<String, DomainError> {
        let guests = self.guests.list_all().await.map_err(guest_error)?;
        Ok(export::render_csv(&guests))
    }

    /// Merge suggestion rows and guest song requests into triage lists.
    ///
    /// Legacy sentinel rows appear like any other anonymous suggestion,
    /// without a submitter name.
    pub async fn song_triage(&self) -> Result<SongTriage, DomainError> {
        let guests = self.guests.list_all().await.map_err(guest_error)?;
        let suggestions = self.suggestions.list_all().await.map_err(suggestion_error)?;

        let mut triage = SongTriage::default();
        for suggestion in suggestions {
            push_entry(
                &mut triage,
                SongTriageEntry {
                    id: suggestion.id,
                    song: suggestion.song,
                    processed: suggestion.processed,
                    submitted_by: None,
                    source: SongSource::Suggestion,
                    created_at: suggestion.created_at,
                },
            );
        }
        for guest in guests.iter().filter(|g| g.has_song_request()) {
            let song = guest
                .song_request
                .clone()
                .unwrap_or_default()
                .trim()
                .to_owned();
            let submitted_by = if guest.is_anonymous_suggestion() {
                None
            } else {
                Some(format!("{} {}", guest.first_name, guest.last_name))
            };
            push_entry(
                &mut triage,
                SongTriageEntry {
                    id: guest.id,
                    song,
                    processed: guest.song_processed,
                    submitted_by,
                    source: SongSource::GuestRequest,
                    created_at: guest.created_at,
                },
            );
        }
        Ok(triage)
    }
}

fn push_entry(triage: &mut SongTriage, entry: SongTriageEntry) {
    if entry.processed {
        triage.added.push(entry);
    } else {
        triage.pending.push(entry);
    }
}

fn guest_error(err: GuestRepositoryError) -> DomainError {
    match err {
        GuestRepositoryError::NotFound { id } => {
            DomainError::not_found(format!("guest not found: {id}"))
        }
        other => {
            error!(error = %other, "guest repository failed");
            DomainError::internal("guest storage is unavailable")
        }
    }
}

fn suggestion_error(err: SuggestionRepositoryError) -> DomainError {
    match err {
        SuggestionRepositoryError::NotFound { id } => {
            DomainError::not_found(format!("song suggestion not found: {id}"))
        }
        other => {
            error!(error = %other, "suggestion repository failed");
            DomainError::internal("suggestion storage is unavailable")
        }
    }
}

/// Verifies the admin access code by SHA-256 fingerprint comparison.
///
/// The configured code is fingerprinted once at startup; candidates are
/// hashed and compared as hex digests, so the plain code never sits in a
/// long-lived string beyond configuration loading.
#[derive(Debug, Clone)]
pub struct AccessCodeVerifier {
    fingerprint: String,
}

impl AccessCodeVerifier {
    /// Fingerprint the configured access code.
    pub fn new(access_code: &str) -> Self {
        Self {
            fingerprint: fingerprint(access_code),
        }
    }

    /// Whether the candidate code matches.
    pub fn verify(&self, candidate: &str) -> bool {
        fingerprint(candidate) == self.fingerprint
    }
}

fn fingerprint(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}
