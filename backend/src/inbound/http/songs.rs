//! Public song suggestion handler.
//!
//! ```text
//! POST /api/v1/songs
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Song suggestion payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongRequest {
    /// The suggested song.
    #[serde(default)]
    pub song: String,
    /// Optional link to the suggester's guest row.
    pub guest_id: Option<Uuid>,
}

/// Stored suggestion identifier.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongResponse {
    /// The new suggestion row.
    pub id: Uuid,
}

/// Leave an anonymous song suggestion.
#[utoipa::path(
    post,
    path = "/api/v1/songs",
    request_body = SongRequest,
    responses(
        (status = 201, description = "Suggestion stored", body = SongResponse),
        (status = 400, description = "Validation failed", body = crate::domain::DomainError),
        (status = 500, description = "Internal server error", body = crate::domain::DomainError)
    ),
    tags = ["songs"],
    operation_id = "suggestSong"
)]
#[post("/songs")]
pub async fn suggest_song(
    state: web::Data<HttpState>,
    payload: web::Json<SongRequest>,
) -> ApiResult<HttpResponse> {
    let id = state
        .songs
        .suggest(&payload.song, payload.guest_id)
        .await?;
    Ok(HttpResponse::Created().json(SongResponse { id }))
}
