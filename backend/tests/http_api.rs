//! End-to-end tests over the HTTP surface, wired from fixture ports.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use backend::domain::admin::{AccessCodeVerifier, GuestAdminService};
use backend::domain::analytics::AnalyticsService;
use backend::domain::email::{ConfirmationEmailService, EmailSettings};
use backend::domain::guest::Guest;
use backend::domain::ports::{
    FixtureEventRepository, FixtureGuestRepository, FixtureMailer, FixtureSuggestionRepository,
};
use backend::domain::rsvp::RsvpService;
use backend::domain::seating::SeatFinderService;
use backend::domain::song::SongSuggestionService;
use backend::domain::Language;
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{admin, rsvp, seating};

const ACCESS_CODE: &str = "VENECIA2026";

fn guest(first: &str, last: &str, table: Option<i32>) -> Guest {
    Guest {
        id: Uuid::new_v4(),
        first_name: first.to_owned(),
        last_name: last.to_owned(),
        email: format!(
            "{}.{}@example.com",
            first.to_lowercase(),
            last.to_lowercase()
        ),
        rsvp_status: Some(true),
        plus_one: false,
        plus_one_name: None,
        children_count: 0,
        children_needs: None,
        dietary_reqs: None,
        language: Language::Es,
        bus_ida: false,
        bus_vuelta: false,
        barco_ida: false,
        barco_vuelta: false,
        preboda: false,
        table_id: table,
        song_request: None,
        song_processed: false,
        notes: None,
        created_at: Utc::now(),
    }
}

fn state(guests: Vec<Guest>) -> web::Data<HttpState> {
    let guest_repo: Arc<FixtureGuestRepository> =
        Arc::new(FixtureGuestRepository::with_guests(guests));
    let suggestions = Arc::new(FixtureSuggestionRepository::default());
    let events = Arc::new(FixtureEventRepository::default());
    let email = ConfirmationEmailService::new(
        Arc::new(FixtureMailer),
        EmailSettings {
            site_url: "https://example.com".to_owned(),
            gift_iban: "ES00 1111 2222 3333".to_owned(),
        },
    );

    web::Data::new(HttpState {
        rsvp: RsvpService::new(guest_repo.clone(), events.clone(), email.clone()),
        seating: SeatFinderService::new(guest_repo.clone()),
        songs: SongSuggestionService::new(suggestions.clone()),
        admin: GuestAdminService::new(guest_repo, suggestions),
        analytics: AnalyticsService::new(events),
        email,
        access_codes: AccessCodeVerifier::new(ACCESS_CODE),
    })
}

fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

#[actix_web::test]
async fn health_probes_answer_with_no_store() {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    let app = test::init_service(App::new().app_data(health).service(ready).service(live)).await;

    for uri in ["/health/ready", "/health/live"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get("Cache-Control")
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
    }
}

#[actix_web::test]
async fn rsvp_round_trip_updates_an_existing_registration() {
    let existing = guest("Lucía", "Pérez", Some(4));
    let email = existing.email.clone();
    let app = test::init_service(
        App::new()
            .app_data(state(vec![existing]))
            .service(rsvp::submit_rsvp),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/rsvp")
            .set_json(json!({
                "firstName": "Lucía",
                "lastName": "Pérez",
                "email": email,
                "rsvpStatus": false
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["updated"], true);
}

#[actix_web::test]
async fn invalid_rsvp_reports_the_offending_field() {
    let app = test::init_service(
        App::new()
            .app_data(state(vec![]))
            .service(rsvp::submit_rsvp),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/rsvp")
            .set_json(json!({ "firstName": "", "lastName": "Pérez", "email": "a@b.com" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "firstName");
}

#[actix_web::test]
async fn seat_search_disambiguates_multiple_matches() {
    let app = test::init_service(
        App::new()
            .app_data(state(vec![
                guest("María", "García", Some(3)),
                guest("Mario", "Garrido", Some(7)),
            ]))
            .service(seating::find_seat),
    )
    .await;

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/seating?q=mar").to_request())
            .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "multiple");
    assert_eq!(body["guests"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn admin_surface_is_gated_by_the_access_code() {
    let app = test::init_service(
        App::new()
            .app_data(state(vec![guest("María", "García", Some(3))]))
            .wrap(session_middleware())
            .service(admin::login)
            .service(admin::list_guests)
            .service(admin::export_guests),
    )
    .await;

    // No session: the list is off limits.
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/admin/guests").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Wrong code is rejected.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/session")
            .set_json(json!({ "accessCode": "wrong" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Correct code grants a session cookie that opens the dashboard.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/session")
            .set_json(json!({ "accessCode": ACCESS_CODE }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/guests")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["metrics"]["total"], 1);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/guests/export")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    let text = String::from_utf8(body.to_vec()).expect("utf-8 csv");
    assert!(text.starts_with('\u{feff}'));
    assert!(text.contains("\"Nombre\""));
}
