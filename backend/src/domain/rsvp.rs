//! RSVP submission flow.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::email::{ConfirmationEmailService, EmailGuestSnapshot};
use crate::domain::events::{EventKind, RsvpEvent};
use crate::domain::guest::{Guest, RsvpSubmission};
use crate::domain::ports::{EventRepository, GuestRepository};
use crate::domain::DomainError;

/// Result of a processed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsvpOutcome {
    /// The guest row the submission landed on.
    pub id: Uuid,
    /// Whether an existing row was updated rather than inserted.
    pub updated: bool,
}

/// Handles RSVP submissions end to end.
///
/// Email dispatch is fire-and-forget: the submitter gets their response as
/// soon as the guest row is written, and delivery results are recorded as
/// events on a spawned task.
#[derive(Clone)]
pub struct RsvpService {
    guests: Arc<dyn GuestRepository>,
    events: Arc<dyn EventRepository>,
    email: ConfirmationEmailService,
}

impl RsvpService {
    /// Build the service around its ports.
    pub fn new(
        guests: Arc<dyn GuestRepository>,
        events: Arc<dyn EventRepository>,
        email: ConfirmationEmailService,
    ) -> Self {
        Self {
            guests,
            events,
            email,
        }
    }

    /// Process one submission.
    ///
    /// Validation happens before any repository access. Guests are
    /// addressed by email: an existing row is overwritten in place, a new
    /// one inserted otherwise. The read-then-write has no transaction; two
    /// simultaneous submissions for the same address may both insert, which
    /// is acceptable at guest-list scale.
    pub async fn submit(&self, submission: RsvpSubmission) -> Result<RsvpOutcome, DomainError> {
        let valid = submission.validate()?;
        let language = valid.language;
        let attending = valid.attending;

        let existing = self
            .guests
            .find_by_email(&valid.email)
            .await
            .map_err(internal)?;

        let (guest, updated) = match existing {
            Some(mut guest) => {
                valid.apply_to(&mut guest);
                self.guests.update(&guest).await.map_err(internal)?;
                (guest, true)
            }
            None => {
                let guest = valid.into_new_guest(Uuid::new_v4(), Utc::now());
                self.guests.insert(&guest).await.map_err(internal)?;
                (guest, false)
            }
        };
        info!(guest_id = %guest.id, updated, attending, "rsvp recorded");

        self.record_event(
            EventKind::ConfirmationRequested,
            Some(attending),
            json!({ "language": language.code() }),
        )
        .await;

        self.spawn_confirmation(&guest);

        Ok(RsvpOutcome {
            id: guest.id,
            updated,
        })
    }

    /// Append an event, logging failures instead of propagating them. The
    /// submission must not fail because the event log is unavailable.
    async fn record_event(
        &self,
        kind: EventKind,
        rsvp_status: Option<bool>,
        metadata: serde_json::Value,
    ) {
        let event = RsvpEvent {
            id: Uuid::new_v4(),
            event_type: kind.as_str().to_owned(),
            rsvp_status,
            metadata: Some(metadata),
            created_at: Utc::now(),
        };
        if let Err(err) = self.events.record(&event).await {
            warn!(event_type = %event.event_type, error = %err, "event write failed");
        }
    }

    fn spawn_confirmation(&self, guest: &Guest) {
        let service = self.clone();
        let snapshot = snapshot_of(guest);
        tokio::spawn(async move {
            let attending = snapshot.attending;
            match service.email.send(&snapshot).await {
                Ok(_) => {
                    let kind = if attending {
                        EventKind::ConfirmEmailSent
                    } else {
                        EventKind::DeclineEmailSent
                    };
                    service
                        .record_event(kind, None, json!({ "language": snapshot.language.code() }))
                        .await;
                }
                Err(err) => {
                    error!(recipient = %snapshot.email, error = %err, "confirmation dispatch failed");
                    service
                        .record_event(EventKind::EmailFailed, None, json!({}))
                        .await;
                }
            }
        });
    }
}

fn snapshot_of(guest: &Guest) -> EmailGuestSnapshot {
    EmailGuestSnapshot {
        email: guest.email.clone(),
        first_name: guest.first_name.clone(),
        language: guest.language,
        attending: guest.rsvp_status == Some(true),
        bus_ida: guest.bus_ida,
        bus_vuelta: guest.bus_vuelta,
        barco_ida: guest.barco_ida,
        barco_vuelta: guest.barco_vuelta,
        dietary_reqs: guest.dietary_reqs.clone(),
        preboda: guest.preboda,
        plus_one: guest.plus_one,
        plus_one_name: guest.plus_one_name.clone(),
        children_count: guest.children_count,
        children_needs: guest.children_needs.clone(),
    }
}

fn internal(err: impl std::error::Error) -> DomainError {
    error!(error = %err, "rsvp persistence failed");
    DomainError::internal("could not store the submission")
}
