//! Direct confirmation email handler.
//!
//! ```text
//! POST /api/v1/email/confirmation
//! ```
//!
//! The body is a guest snapshot, either bare or wrapped in a database
//! webhook envelope under `record`.

use actix_web::{post, web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::email::EmailGuestSnapshot;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Acknowledgement of an accepted email.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailResponse {
    /// Always true on success.
    pub success: bool,
    /// Provider-assigned message id, when one was returned.
    pub id: Option<String>,
}

/// Send a confirmation email for a guest snapshot.
#[utoipa::path(
    post,
    path = "/api/v1/email/confirmation",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Email accepted by the provider", body = EmailResponse),
        (status = 400, description = "Missing email or first name", body = crate::domain::DomainError),
        (status = 500, description = "Provider rejection or transport failure", body = crate::domain::DomainError)
    ),
    tags = ["email"],
    operation_id = "sendConfirmationEmail"
)]
#[post("/email/confirmation")]
pub async fn send_confirmation(
    state: web::Data<HttpState>,
    payload: web::Json<serde_json::Value>,
) -> ApiResult<HttpResponse> {
    let snapshot = EmailGuestSnapshot::from_payload(&payload)?;
    let receipt = state.email.send(&snapshot).await?;
    Ok(HttpResponse::Ok().json(EmailResponse {
        success: true,
        id: receipt.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureEventRepository, FixtureGuestRepository, FixtureSuggestionRepository, MailerError,
        MockConfirmationMailer,
    };
    use crate::inbound::http::state::fixtures::{fixture_state, state_with};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;
    use std::sync::Arc;

    async fn post_email(
        state: web::Data<HttpState>,
        body: serde_json::Value,
    ) -> actix_web::dev::ServiceResponse {
        let app =
            test::init_service(App::new().app_data(state).service(send_confirmation)).await;
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/email/confirmation")
                .set_json(body)
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn bare_snapshots_are_accepted() {
        let res = post_email(
            web::Data::new(fixture_state(vec![])),
            json!({ "email": "a@example.com", "first_name": "Ana", "rsvp_status": true }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["id"], "fixture-mail");
    }

    #[actix_web::test]
    async fn webhook_envelopes_are_accepted() {
        let res = post_email(
            web::Data::new(fixture_state(vec![])),
            json!({ "record": { "email": "a@example.com", "first_name": "Ana" } }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn missing_recipient_is_a_field_error() {
        let res = post_email(
            web::Data::new(fixture_state(vec![])),
            json!({ "first_name": "Ana" }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "email");
    }

    #[actix_web::test]
    async fn provider_rejections_surface_as_500_with_details() {
        let mut mailer = MockConfirmationMailer::new();
        mailer.expect_send().returning(|_| {
            Err(MailerError::Api {
                status: 422,
                body: "invalid from".to_owned(),
            })
        });
        let state = web::Data::new(state_with(
            Arc::new(FixtureGuestRepository::default()),
            Arc::new(FixtureSuggestionRepository::default()),
            Arc::new(FixtureEventRepository::default()),
            Arc::new(mailer),
        ));

        let res = post_email(
            state,
            json!({ "email": "a@example.com", "first_name": "Ana" }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["status"], 422);
    }
}
