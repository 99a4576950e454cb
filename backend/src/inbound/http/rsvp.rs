//! RSVP submission handler.
//!
//! ```text
//! POST /api/v1/rsvp
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::guest::RsvpSubmission;
use crate::domain::Language;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// RSVP form payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Surname.
    #[serde(default)]
    pub last_name: String,
    /// Email address, the guest's addressing key.
    #[serde(default)]
    pub email: String,
    /// Attendance choice. Absent means unanswered and is rejected.
    pub rsvp_status: Option<bool>,
    /// Plus-one toggle.
    #[serde(default)]
    pub plus_one: bool,
    /// Companion name.
    pub plus_one_name: Option<String>,
    /// Children attending.
    #[serde(default)]
    pub children_count: i32,
    /// Children needs text.
    pub children_needs: Option<String>,
    /// Dietary text.
    pub dietary_reqs: Option<String>,
    /// Outbound bus opt-in.
    #[serde(default)]
    pub bus_ida: bool,
    /// Return bus opt-in.
    #[serde(default)]
    pub bus_vuelta: bool,
    /// Outbound boat opt-in.
    #[serde(default)]
    pub barco_ida: bool,
    /// Return boat opt-in.
    #[serde(default)]
    pub barco_vuelta: bool,
    /// Pre-wedding opt-in.
    #[serde(default)]
    pub preboda: bool,
    /// Language code; unknown values fall back to Spanish.
    pub language: Option<String>,
}

impl From<RsvpRequest> for RsvpSubmission {
    fn from(payload: RsvpRequest) -> Self {
        Self {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            attending: payload.rsvp_status,
            plus_one: payload.plus_one,
            plus_one_name: payload.plus_one_name,
            children_count: payload.children_count,
            children_needs: payload.children_needs,
            dietary_reqs: payload.dietary_reqs,
            bus_ida: payload.bus_ida,
            bus_vuelta: payload.bus_vuelta,
            barco_ida: payload.barco_ida,
            barco_vuelta: payload.barco_vuelta,
            preboda: payload.preboda,
            language: payload
                .language
                .as_deref()
                .map(Language::normalise)
                .unwrap_or_default(),
        }
    }
}

/// RSVP submission response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RsvpResponse {
    /// The guest row the submission landed on.
    pub id: Uuid,
    /// Whether an existing registration was updated.
    pub updated: bool,
}

/// Submit or update an RSVP.
#[utoipa::path(
    post,
    path = "/api/v1/rsvp",
    request_body = RsvpRequest,
    responses(
        (status = 201, description = "Submission stored", body = RsvpResponse),
        (status = 400, description = "Validation failed", body = crate::domain::DomainError),
        (status = 500, description = "Internal server error", body = crate::domain::DomainError)
    ),
    tags = ["rsvp"],
    operation_id = "submitRsvp"
)]
#[post("/rsvp")]
pub async fn submit_rsvp(
    state: web::Data<HttpState>,
    payload: web::Json<RsvpRequest>,
) -> ApiResult<HttpResponse> {
    let outcome = state.rsvp.submit(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(RsvpResponse {
        id: outcome.id,
        updated: outcome.updated,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::state::fixtures::fixture_state;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;

    async fn post_rsvp(body: serde_json::Value) -> actix_web::dev::ServiceResponse {
        let state = web::Data::new(fixture_state(vec![]));
        let app = test::init_service(App::new().app_data(state).service(submit_rsvp)).await;
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/rsvp")
                .set_json(body)
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn valid_submission_returns_created() {
        let res = post_rsvp(json!({
            "firstName": "Irene",
            "lastName": "García",
            "email": "irene@example.com",
            "rsvpStatus": true,
            "language": "es"
        }))
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["updated"], false);
        assert!(body["id"].is_string());
    }

    #[actix_web::test]
    async fn missing_attendance_is_a_field_error() {
        let res = post_rsvp(json!({
            "firstName": "Irene",
            "lastName": "García",
            "email": "irene@example.com"
        }))
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "rsvpStatus");
    }

    #[actix_web::test]
    async fn malformed_email_is_rejected() {
        let res = post_rsvp(json!({
            "firstName": "Irene",
            "lastName": "García",
            "email": "not-an-email",
            "rsvpStatus": false
        }))
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "email");
    }

    #[actix_web::test]
    async fn unknown_language_falls_back_to_spanish() {
        let submission: RsvpSubmission = RsvpRequest {
            language: Some("fr".to_owned()),
            ..RsvpRequest::default()
        }
        .into();
        assert_eq!(submission.language, Language::Es);
    }
}
