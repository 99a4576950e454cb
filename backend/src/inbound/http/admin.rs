//! Admin handlers: session, guest management, CSV export, song triage.
//!
//! ```text
//! POST   /api/v1/admin/session
//! DELETE /api/v1/admin/session
//! GET    /api/v1/admin/guests
//! POST   /api/v1/admin/guests
//! PATCH  /api/v1/admin/guests/{id}
//! DELETE /api/v1/admin/guests/{id}
//! PATCH  /api/v1/admin/guests/{id}/song
//! GET    /api/v1/admin/guests/export
//! GET    /api/v1/admin/songs
//! PATCH  /api/v1/admin/songs/{id}
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::admin::{GuestMetrics, NewGuest, SongTriage};
use crate::domain::guest::Guest;
use crate::domain::song::{SongSource, SongTriageEntry};
use crate::domain::{DomainError, Language};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Admin login payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// The shared access code.
    #[serde(default)]
    pub access_code: String,
}

/// Authenticate the admin session.
#[utoipa::path(
    post,
    path = "/api/v1/admin/session",
    request_body = LoginRequest,
    responses(
        (status = 204, description = "Session authenticated"),
        (status = 401, description = "Wrong access code", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "adminLogin"
)]
#[post("/admin/session")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    if !state.access_codes.verify(&payload.access_code) {
        return Err(DomainError::unauthorized("wrong access code"));
    }
    session.grant_admin()?;
    info!("admin session opened");
    Ok(HttpResponse::NoContent().finish())
}

/// Log out of the admin session.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/session",
    responses((status = 204, description = "Session cleared")),
    tags = ["admin"],
    operation_id = "adminLogout"
)]
#[delete("/admin/session")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}

/// One guest row as the dashboard sees it.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminGuestResponse {
    /// Row identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Surname.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Attendance; `null` while pending.
    pub rsvp_status: Option<bool>,
    /// Plus-one toggle.
    pub plus_one: bool,
    /// Companion name.
    pub plus_one_name: Option<String>,
    /// Children attending.
    pub children_count: i32,
    /// Children needs text.
    pub children_needs: Option<String>,
    /// Dietary text.
    pub dietary_reqs: Option<String>,
    /// Language code.
    pub language: String,
    /// Outbound bus opt-in.
    pub bus_ida: bool,
    /// Return bus opt-in.
    pub bus_vuelta: bool,
    /// Outbound boat opt-in.
    pub barco_ida: bool,
    /// Return boat opt-in.
    pub barco_vuelta: bool,
    /// Pre-wedding opt-in.
    pub preboda: bool,
    /// Assigned table.
    pub table_id: Option<i32>,
    /// Song request text.
    pub song_request: Option<String>,
    /// Song triage state.
    pub song_processed: bool,
    /// Coordination notes.
    pub notes: Option<String>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Guest> for AdminGuestResponse {
    fn from(guest: Guest) -> Self {
        Self {
            id: guest.id,
            first_name: guest.first_name,
            last_name: guest.last_name,
            email: guest.email,
            rsvp_status: guest.rsvp_status,
            plus_one: guest.plus_one,
            plus_one_name: guest.plus_one_name,
            children_count: guest.children_count,
            children_needs: guest.children_needs,
            dietary_reqs: guest.dietary_reqs,
            language: guest.language.code().to_owned(),
            bus_ida: guest.bus_ida,
            bus_vuelta: guest.bus_vuelta,
            barco_ida: guest.barco_ida,
            barco_vuelta: guest.barco_vuelta,
            preboda: guest.preboda,
            table_id: guest.table_id,
            song_request: guest.song_request,
            song_processed: guest.song_processed,
            notes: guest.notes,
            created_at: guest.created_at,
        }
    }
}

/// Guest list plus dashboard counters.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestListResponse {
    /// Guests sorted by surname.
    pub guests: Vec<AdminGuestResponse>,
    /// Counters over non-anonymous rows.
    pub metrics: GuestMetrics,
}

/// The full guest list with counters.
#[utoipa::path(
    get,
    path = "/api/v1/admin/guests",
    responses(
        (status = 200, description = "Guest list", body = GuestListResponse),
        (status = 401, description = "Admin login required", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "adminListGuests"
)]
#[get("/admin/guests")]
pub async fn list_guests(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let (guests, metrics) = state.admin.overview().await?;
    Ok(HttpResponse::Ok().json(GuestListResponse {
        guests: guests.into_iter().map(Into::into).collect(),
        metrics,
    }))
}

/// Manually added guest payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewGuestRequest {
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Surname.
    #[serde(default)]
    pub last_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Pre-set attendance; absent leaves the guest pending.
    pub confirmed: Option<bool>,
    /// Dietary text.
    pub dietary_reqs: Option<String>,
    /// Language code, defaults to Spanish.
    pub language: Option<String>,
}

/// Created guest identifier.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGuestResponse {
    /// The new guest row.
    pub id: Uuid,
}

/// Add a guest by hand.
#[utoipa::path(
    post,
    path = "/api/v1/admin/guests",
    request_body = NewGuestRequest,
    responses(
        (status = 201, description = "Guest created", body = CreatedGuestResponse),
        (status = 400, description = "Validation failed", body = DomainError),
        (status = 401, description = "Admin login required", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "adminAddGuest"
)]
#[post("/admin/guests")]
pub async fn add_guest(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NewGuestRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let payload = payload.into_inner();
    let id = state
        .admin
        .add_guest(NewGuest {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            confirmed: payload.confirmed,
            dietary_reqs: payload.dietary_reqs,
            language: payload
                .language
                .as_deref()
                .map(Language::normalise)
                .unwrap_or_default(),
        })
        .await?;
    Ok(HttpResponse::Created().json(CreatedGuestResponse { id }))
}

/// Table assignment payload. `null` clears the assignment.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableRequest {
    /// The table to assign, or `null` to unassign.
    pub table_id: Option<i32>,
}

/// Assign or clear a guest's table.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/guests/{id}",
    request_body = TableRequest,
    params(("id" = Uuid, Path, description = "Guest identifier")),
    responses(
        (status = 204, description = "Table updated"),
        (status = 401, description = "Admin login required", body = DomainError),
        (status = 404, description = "Unknown guest", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "adminSetTable"
)]
#[patch("/admin/guests/{id}")]
pub async fn set_table(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    payload: web::Json<TableRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    state.admin.set_table(*id, payload.table_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a guest.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/guests/{id}",
    params(("id" = Uuid, Path, description = "Guest identifier")),
    responses(
        (status = 204, description = "Guest deleted"),
        (status = 401, description = "Admin login required", body = DomainError),
        (status = 404, description = "Unknown guest", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteGuest"
)]
#[delete("/admin/guests/{id}")]
pub async fn delete_guest(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    state.admin.delete_guest(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Song triage flag payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedRequest {
    /// Whether the song has been dealt with.
    pub processed: bool,
}

/// Flip the processed flag on a guest's song request.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/guests/{id}/song",
    request_body = ProcessedRequest,
    params(("id" = Uuid, Path, description = "Guest identifier")),
    responses(
        (status = 204, description = "Flag updated"),
        (status = 401, description = "Admin login required", body = DomainError),
        (status = 404, description = "Unknown guest", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "adminSetGuestSongProcessed"
)]
#[patch("/admin/guests/{id}/song")]
pub async fn set_guest_song_processed(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    payload: web::Json<ProcessedRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    state
        .admin
        .set_guest_song_processed(*id, payload.processed)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Download the guest list as CSV.
#[utoipa::path(
    get,
    path = "/api/v1/admin/guests/export",
    responses(
        (status = 200, description = "CSV payload", content_type = "text/csv"),
        (status = 401, description = "Admin login required", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "adminExportGuests"
)]
#[get("/admin/guests/export")]
pub async fn export_guests(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let csv = state.admin.export_csv().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"invitados.csv\"",
        ))
        .body(csv))
}

/// One song triage entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriageEntryResponse {
    /// Underlying row identifier.
    pub id: Uuid,
    /// The song text.
    pub song: String,
    /// Triage state.
    pub processed: bool,
    /// Submitter name; `null` for anonymous suggestions.
    pub submitted_by: Option<String>,
    /// Where the entry came from.
    pub source: SongSource,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<SongTriageEntry> for TriageEntryResponse {
    fn from(entry: SongTriageEntry) -> Self {
        Self {
            id: entry.id,
            song: entry.song,
            processed: entry.processed,
            submitted_by: entry.submitted_by,
            source: entry.source,
            created_at: entry.created_at,
        }
    }
}

/// Song triage lists.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriageResponse {
    /// Songs still to be dealt with.
    pub pending: Vec<TriageEntryResponse>,
    /// Songs already on the playlist.
    pub added: Vec<TriageEntryResponse>,
}

impl From<SongTriage> for TriageResponse {
    fn from(triage: SongTriage) -> Self {
        Self {
            pending: triage.pending.into_iter().map(Into::into).collect(),
            added: triage.added.into_iter().map(Into::into).collect(),
        }
    }
}

/// Song triage across suggestions and guest requests.
#[utoipa::path(
    get,
    path = "/api/v1/admin/songs",
    responses(
        (status = 200, description = "Triage lists", body = TriageResponse),
        (status = 401, description = "Admin login required", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "adminListSongs"
)]
#[get("/admin/songs")]
pub async fn list_songs(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let triage = state.admin.song_triage().await?;
    Ok(HttpResponse::Ok().json(TriageResponse::from(triage)))
}

/// Flip the processed flag on an anonymous suggestion.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/songs/{id}",
    request_body = ProcessedRequest,
    params(("id" = Uuid, Path, description = "Suggestion identifier")),
    responses(
        (status = 204, description = "Flag updated"),
        (status = 401, description = "Admin login required", body = DomainError),
        (status = 404, description = "Unknown suggestion", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "adminSetSuggestionProcessed"
)]
#[patch("/admin/songs/{id}")]
pub async fn set_suggestion_processed(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    payload: web::Json<ProcessedRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    state
        .admin
        .set_suggestion_processed(*id, payload.processed)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
