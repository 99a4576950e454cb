//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers deal with one domain-friendly
//! question: is this caller an authenticated admin?

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::DomainError;

pub(crate) const ADMIN_KEY: &str = "admin";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Mark the session as an authenticated admin.
    pub fn grant_admin(&self) -> Result<(), DomainError> {
        self.0
            .insert(ADMIN_KEY, true)
            .map_err(|error| DomainError::internal(format!("failed to persist session: {error}")))
    }

    /// Drop everything from the session.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Whether the session carries the admin flag.
    pub fn is_admin(&self) -> Result<bool, DomainError> {
        self.0
            .get::<bool>(ADMIN_KEY)
            .map(|flag| flag.unwrap_or(false))
            .map_err(|error| DomainError::internal(format!("failed to read session: {error}")))
    }

    /// Require an admin session or return `401 Unauthorized`.
    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.is_admin()? {
            Ok(())
        } else {
            Err(DomainError::unauthorized("admin login required"))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    #[actix_web::test]
    async fn admin_flag_round_trips() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/grant",
                    web::get().to(|session: SessionContext| async move {
                        session.grant_admin()?;
                        Ok::<_, DomainError>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        session.require_admin()?;
                        Ok::<_, DomainError>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let grant_res =
            test::call_service(&app, test::TestRequest::get().uri("/grant").to_request()).await;
        assert_eq!(grant_res.status(), StatusCode::OK);
        let cookie = grant_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/require")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn missing_admin_flag_is_unauthorised() {
        let app = test::init_service(session_test_app().route(
            "/require",
            web::get().to(|session: SessionContext| async move {
                session.require_admin()?;
                Ok::<_, DomainError>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/require").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
