//! Server bootstrap: configuration, schema migration, and service wiring.

pub mod config;

use std::sync::Arc;

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::domain::admin::{AccessCodeVerifier, GuestAdminService};
use crate::domain::analytics::AnalyticsService;
use crate::domain::email::{ConfirmationEmailService, EmailSettings};
use crate::domain::ports::{ConfirmationMailer, EventRepository, GuestRepository, SuggestionRepository};
use crate::domain::rsvp::RsvpService;
use crate::domain::seating::SeatFinderService;
use crate::domain::song::SongSuggestionService;
use crate::inbound::http::state::HttpState;
use crate::outbound::email::ResendMailer;
use crate::outbound::persistence::{
    DbPool, DieselEventRepository, DieselGuestRepository, DieselSuggestionRepository,
};

use config::AppConfig;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations over a short-lived synchronous connection.
pub fn migrate(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| std::io::Error::other(format!("migration failed: {err}")))?;
    Ok(())
}

/// Wire the domain services over the real adapters.
pub fn build_state(config: &AppConfig, pool: DbPool) -> HttpState {
    let guests: Arc<dyn GuestRepository> = Arc::new(DieselGuestRepository::new(pool.clone()));
    let suggestions: Arc<dyn SuggestionRepository> =
        Arc::new(DieselSuggestionRepository::new(pool.clone()));
    let events: Arc<dyn EventRepository> = Arc::new(DieselEventRepository::new(pool));
    let mailer: Arc<dyn ConfirmationMailer> = Arc::new(ResendMailer::new(
        config.resend_api_key.clone(),
        config.mail_from.clone(),
    ));

    let email = ConfirmationEmailService::new(
        mailer,
        EmailSettings {
            site_url: config.site_url.clone(),
            gift_iban: config.gift_iban.clone(),
        },
    );

    HttpState {
        rsvp: RsvpService::new(guests.clone(), events.clone(), email.clone()),
        seating: SeatFinderService::new(guests.clone()),
        songs: SongSuggestionService::new(suggestions.clone()),
        admin: GuestAdminService::new(guests, suggestions),
        analytics: AnalyticsService::new(events),
        email,
        access_codes: AccessCodeVerifier::new(&config.admin_access_code),
    }
}
