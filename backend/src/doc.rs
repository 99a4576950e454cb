//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every HTTP endpoint and the schemas they
//! reference. Debug builds serve the generated document at
//! `/api-docs/openapi.json` for frontend tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/admin/session.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Wedding invitation backend API",
        description = "RSVP submissions, seat finding, song suggestions, the admin dashboard, analytics, and confirmation emails."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::rsvp::submit_rsvp,
        crate::inbound::http::seating::find_seat,
        crate::inbound::http::songs::suggest_song,
        crate::inbound::http::events::track_event,
        crate::inbound::http::analytics::analytics_report,
        crate::inbound::http::email::send_confirmation,
        crate::inbound::http::admin::login,
        crate::inbound::http::admin::logout,
        crate::inbound::http::admin::list_guests,
        crate::inbound::http::admin::add_guest,
        crate::inbound::http::admin::set_table,
        crate::inbound::http::admin::delete_guest,
        crate::inbound::http::admin::set_guest_song_processed,
        crate::inbound::http::admin::export_guests,
        crate::inbound::http::admin::list_songs,
        crate::inbound::http::admin::set_suggestion_processed,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::DomainError,
        crate::domain::ErrorCode,
        crate::domain::Language,
        crate::domain::admin::GuestMetrics,
        crate::domain::analytics::AnalyticsReport,
        crate::domain::analytics::AnalyticsSummary,
        crate::domain::analytics::EngagementCounters,
        crate::domain::analytics::LanguageCounters,
        crate::domain::analytics::FunnelCounters,
        crate::domain::song::SongSource,
        crate::inbound::http::rsvp::RsvpRequest,
        crate::inbound::http::rsvp::RsvpResponse,
        crate::inbound::http::seating::SeatCandidateResponse,
        crate::inbound::http::seating::SeatSearchResponse,
        crate::inbound::http::songs::SongRequest,
        crate::inbound::http::songs::SongResponse,
        crate::inbound::http::events::EventRequest,
        crate::inbound::http::email::EmailResponse,
        crate::inbound::http::admin::LoginRequest,
        crate::inbound::http::admin::AdminGuestResponse,
        crate::inbound::http::admin::GuestListResponse,
        crate::inbound::http::admin::NewGuestRequest,
        crate::inbound::http::admin::CreatedGuestResponse,
        crate::inbound::http::admin::TableRequest,
        crate::inbound::http::admin::ProcessedRequest,
        crate::inbound::http::admin::TriageEntryResponse,
        crate::inbound::http::admin::TriageResponse,
    )),
    security(("SessionCookie" = [])),
    tags(
        (name = "rsvp", description = "RSVP submissions"),
        (name = "seating", description = "Public seat finder"),
        (name = "songs", description = "Song suggestions"),
        (name = "events", description = "Event tracking"),
        (name = "analytics", description = "Admin analytics"),
        (name = "email", description = "Confirmation email dispatch"),
        (name = "admin", description = "Admin dashboard"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_registers_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/v1/rsvp",
            "/api/v1/seating",
            "/api/v1/songs",
            "/api/v1/events",
            "/api/v1/analytics",
            "/api/v1/email/confirmation",
            "/api/v1/admin/session",
            "/api/v1/admin/guests",
            "/api/v1/admin/guests/export",
            "/api/v1/admin/songs",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        let error_schema = schemas
            .keys()
            .find(|name| name.ends_with("DomainError"))
            .expect("DomainError schema");
        assert!(!error_schema.is_empty());
    }
}
