//! Seat finder handler.
//!
//! ```text
//! GET /api/v1/seating?q=<name fragment>
//! ```

use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::seating::{SeatCandidate, SeatSearchOutcome};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Seat search query string.
#[derive(Debug, Deserialize)]
pub struct SeatQuery {
    /// Partial first or last name.
    #[serde(default)]
    pub q: String,
}

/// One matching guest.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatCandidateResponse {
    /// Guest identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Surname.
    pub last_name: String,
    /// Assigned table; `null` means seating is not decided yet.
    pub table_id: Option<i32>,
}

impl From<SeatCandidate> for SeatCandidateResponse {
    fn from(candidate: SeatCandidate) -> Self {
        Self {
            id: candidate.id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            table_id: candidate.table_id,
        }
    }
}

/// Seat search outcome.
///
/// `multiple` includes every candidate's table so the client can finish the
/// disambiguation without another round trip.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SeatSearchResponse {
    /// No confirmed guest matched.
    NotFound,
    /// Exactly one match.
    #[serde(rename_all = "camelCase")]
    Single {
        /// The matching guest.
        guest: SeatCandidateResponse,
    },
    /// Several matches.
    #[serde(rename_all = "camelCase")]
    Multiple {
        /// Candidates for client-side selection.
        guests: Vec<SeatCandidateResponse>,
    },
}

impl From<SeatSearchOutcome> for SeatSearchResponse {
    fn from(outcome: SeatSearchOutcome) -> Self {
        match outcome {
            SeatSearchOutcome::NotFound => Self::NotFound,
            SeatSearchOutcome::Single(candidate) => Self::Single {
                guest: candidate.into(),
            },
            SeatSearchOutcome::Multiple(candidates) => Self::Multiple {
                guests: candidates.into_iter().map(Into::into).collect(),
            },
        }
    }
}

/// Find a confirmed guest's table by name.
#[utoipa::path(
    get,
    path = "/api/v1/seating",
    params(("q" = String, Query, description = "Partial first or last name")),
    responses(
        (status = 200, description = "Search outcome", body = SeatSearchResponse),
        (status = 400, description = "Empty query", body = crate::domain::DomainError),
        (status = 500, description = "Internal server error", body = crate::domain::DomainError)
    ),
    tags = ["seating"],
    operation_id = "findSeat"
)]
#[get("/seating")]
pub async fn find_seat(
    state: web::Data<HttpState>,
    query: web::Query<SeatQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = state.seating.find(&query.q).await?;
    Ok(HttpResponse::Ok().json(SeatSearchResponse::from(outcome)))
}
