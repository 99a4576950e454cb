//! Event tracking handler.
//!
//! ```text
//! POST /api/v1/events
//! ```

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Tracking event payload. Unknown event types are stored verbatim.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    /// Wire event type.
    #[serde(default)]
    pub event_type: String,
    /// Attendance flag for confirmation-requested events.
    pub rsvp_status: Option<bool>,
    /// Free-form metadata.
    pub metadata: Option<serde_json::Value>,
}

/// Record one tracking event.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = EventRequest,
    responses(
        (status = 202, description = "Event accepted"),
        (status = 400, description = "Validation failed", body = crate::domain::DomainError),
        (status = 500, description = "Internal server error", body = crate::domain::DomainError)
    ),
    tags = ["analytics"],
    operation_id = "trackEvent"
)]
#[post("/events")]
pub async fn track_event(
    state: web::Data<HttpState>,
    payload: web::Json<EventRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    state
        .analytics
        .track(&payload.event_type, payload.rsvp_status, payload.metadata)
        .await?;
    Ok(HttpResponse::Accepted().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::state::fixtures::fixture_state;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;

    async fn post_event(body: serde_json::Value) -> actix_web::dev::ServiceResponse {
        let state = web::Data::new(fixture_state(vec![]));
        let app = test::init_service(App::new().app_data(state).service(track_event)).await;
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/events")
                .set_json(body)
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn events_are_accepted() {
        let res = post_event(json!({
            "eventType": "rsvp_form_view",
            "metadata": { "language": "es" }
        }))
        .await;
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    #[actix_web::test]
    async fn unknown_event_types_are_accepted_verbatim() {
        let res = post_event(json!({ "eventType": "share_click" })).await;
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    #[actix_web::test]
    async fn blank_event_types_are_rejected() {
        let res = post_event(json!({ "eventType": "  " })).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
