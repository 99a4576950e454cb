//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use crate::domain::admin::{AccessCodeVerifier, GuestAdminService};
use crate::domain::analytics::AnalyticsService;
use crate::domain::email::ConfirmationEmailService;
use crate::domain::rsvp::RsvpService;
use crate::domain::seating::SeatFinderService;
use crate::domain::song::SongSuggestionService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// RSVP submission flow.
    pub rsvp: RsvpService,
    /// Seat finder.
    pub seating: SeatFinderService,
    /// Public song suggestions.
    pub songs: SongSuggestionService,
    /// Admin guest management and song triage.
    pub admin: GuestAdminService,
    /// Event tracking and aggregation.
    pub analytics: AnalyticsService,
    /// Direct confirmation email dispatch.
    pub email: ConfirmationEmailService,
    /// Admin access code verification.
    pub access_codes: AccessCodeVerifier,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use super::*;
    use crate::domain::email::EmailSettings;
    use crate::domain::guest::Guest;
    use crate::domain::ports::{
        ConfirmationMailer, EventRepository, FixtureEventRepository, FixtureGuestRepository,
        FixtureMailer, FixtureSuggestionRepository, GuestRepository, SuggestionRepository,
    };

    pub const TEST_ACCESS_CODE: &str = "VENECIA2026";

    pub fn email_settings() -> EmailSettings {
        EmailSettings {
            site_url: "https://example.com".to_owned(),
            gift_iban: "ES00 1111 2222 3333".to_owned(),
        }
    }

    /// State wired entirely from fixtures, optionally seeded with guests.
    pub fn fixture_state(guests: Vec<Guest>) -> HttpState {
        state_with(
            Arc::new(FixtureGuestRepository::with_guests(guests)),
            Arc::new(FixtureSuggestionRepository::default()),
            Arc::new(FixtureEventRepository::default()),
            Arc::new(FixtureMailer),
        )
    }

    /// State wired from the given ports, fixtures elsewhere.
    pub fn state_with(
        guests: Arc<dyn GuestRepository>,
        suggestions: Arc<dyn SuggestionRepository>,
        events: Arc<dyn EventRepository>,
        mailer: Arc<dyn ConfirmationMailer>,
    ) -> HttpState {
        let email = ConfirmationEmailService::new(mailer, email_settings());
        HttpState {
            rsvp: RsvpService::new(guests.clone(), events.clone(), email.clone()),
            seating: SeatFinderService::new(guests.clone()),
            songs: SongSuggestionService::new(suggestions.clone()),
            admin: GuestAdminService::new(guests, suggestions),
            analytics: AnalyticsService::new(events),
            email,
            access_codes: AccessCodeVerifier::new(TEST_ACCESS_CODE),
        }
    }
}
