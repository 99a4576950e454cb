//! Analytics report handler.
//!
//! ```text
//! GET /api/v1/analytics?from=&to=
//! ```

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_rfc3339;
use crate::inbound::http::ApiResult;

/// Optional inclusive time bounds.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// Inclusive lower bound, RFC 3339.
    pub from: Option<String>,
    /// Inclusive upper bound, RFC 3339.
    pub to: Option<String>,
}

/// Aggregate recorded events into the dashboard report.
#[utoipa::path(
    get,
    path = "/api/v1/analytics",
    params(
        ("from" = Option<String>, Query, description = "Inclusive RFC 3339 lower bound"),
        ("to" = Option<String>, Query, description = "Inclusive RFC 3339 upper bound")
    ),
    responses(
        (status = 200, description = "Aggregated report", body = crate::domain::analytics::AnalyticsReport),
        (status = 400, description = "Invalid timestamp", body = crate::domain::DomainError),
        (status = 401, description = "Admin login required", body = crate::domain::DomainError),
        (status = 500, description = "Internal server error", body = crate::domain::DomainError)
    ),
    tags = ["analytics"],
    operation_id = "analyticsReport"
)]
#[get("/analytics")]
pub async fn analytics_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AnalyticsQuery>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let from = parse_rfc3339("from", query.from.as_deref())?;
    let to = parse_rfc3339("to", query.to.as_deref())?;
    let report = state.analytics.report(from, to).await?;
    Ok(HttpResponse::Ok().json(report))
}
