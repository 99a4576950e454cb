//! Backend entry-point: wires the HTTP surface over the real adapters.

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::{web, App, HttpServer};
use std::env;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;

use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::{admin, analytics, email, events, rsvp, seating, songs};
use backend::outbound::persistence::DbPool;
use backend::server::config::AppConfig;
use backend::server::{build_state, migrate};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    migrate(&config.database_url)?;

    let pool = DbPool::new(config.pool_config())
        .await
        .map_err(std::io::Error::other)?;
    let state = web::Data::new(build_state(&config, pool));

    let key = load_session_key(&config.session_key_file)?;
    let cookie_secure = config.session_cookie_secure;

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .service(rsvp::submit_rsvp)
            .service(seating::find_seat)
            .service(songs::suggest_song)
            .service(events::track_event)
            .service(analytics::analytics_report)
            .service(email::send_confirmation)
            .service(admin::login)
            .service(admin::logout)
            .service(admin::list_guests)
            .service(admin::add_guest)
            .service(admin::export_guests)
            .service(admin::set_table)
            .service(admin::delete_guest)
            .service(admin::set_guest_song_processed)
            .service(admin::list_songs)
            .service(admin::set_suggestion_processed);

        let app = App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.route(
            "/api-docs/openapi.json",
            web::get().to(|| async {
                actix_web::HttpResponse::Ok().json(backend::ApiDoc::openapi())
            }),
        );

        app
    })
    .bind(&config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Load the session cookie key, falling back to an ephemeral key only in
/// debug builds or when explicitly allowed.
fn load_session_key(path: &str) -> std::io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {path}: {e}"
                )))
            }
        }
    }
}
