//! Analytics aggregation over recorded events.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::events::{EventKind, RsvpEvent};

/// Headline totals for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AnalyticsSummary {
    /// Every event in range, regardless of type.
    pub total_events: u64,
    /// Confirmation requests whose attendance flag was true.
    pub confirmations: u64,
    /// Confirmation requests whose flag was false or missing.
    pub declines: u64,
    /// Confirmation emails sent, attending and declining combined.
    pub emails_sent: u64,
    /// Confirmation emails that failed to send.
    pub emails_failed: u64,
}

/// Interaction counters outside the RSVP flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct EngagementCounters {
    /// Gift IBAN copies.
    pub iban_clicks: u64,
    /// Hotel information opens.
    pub hotel_clicks: u64,
}

/// Language split of confirmation requests.
///
/// Only the three supported languages are bucketed; anything else in the
/// metadata is ignored rather than folded into a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct LanguageCounters {
    /// Spanish submissions.
    pub es: u64,
    /// English submissions.
    pub en: u64,
    /// Italian submissions.
    pub it: u64,
}

/// RSVP form funnel stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FunnelCounters {
    /// Form became visible.
    pub form_views: u64,
    /// First interaction with the form.
    pub form_starts: u64,
    /// Submissions that reached the backend.
    pub form_submits: u64,
}

/// Full aggregation result for a time range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AnalyticsReport {
    /// Headline totals.
    pub summary: AnalyticsSummary,
    /// Engagement counters.
    pub engagement: EngagementCounters,
    /// Language split.
    pub languages: LanguageCounters,
    /// Funnel stages.
    pub funnel: FunnelCounters,
    /// Per-type frequency table, including types without a dedicated
    /// counter.
    pub event_types: BTreeMap<String, u64>,
}

/// Aggregate events into a report in one linear pass.
pub fn aggregate(events: &[RsvpEvent]) -> AnalyticsReport {
    let mut report = AnalyticsReport::default();
    for event in events {
        report.summary.total_events += 1;
        *report
            .event_types
            .entry(event.event_type.clone())
            .or_insert(0) += 1;

        match event.kind() {
            EventKind::FormView => report.funnel.form_views += 1,
            EventKind::FormStart => report.funnel.form_starts += 1,
            EventKind::ConfirmationRequested => {
                report.funnel.form_submits += 1;
                // A request without a readable flag counts as a decline.
                if event.attendance_flag().unwrap_or(false) {
                    report.summary.confirmations += 1;
                } else {
                    report.summary.declines += 1;
                }
                match event.metadata_str("language") {
                    Some("es") => report.languages.es += 1,
                    Some("en") => report.languages.en += 1,
                    Some("it") => report.languages.it += 1,
                    _ => {}
                }
            }
            EventKind::ConfirmEmailSent | EventKind::DeclineEmailSent => {
                report.summary.emails_sent += 1;
            }
            EventKind::EmailFailed => report.summary.emails_failed += 1,
            EventKind::IbanCopy => report.engagement.iban_clicks += 1,
            EventKind::HotelInfo => report.engagement.hotel_clicks += 1,
            EventKind::Other(_) => {}
        }
    }
    report
}

/// Records tracking events and serves aggregated reports.
#[derive(Clone)]
pub struct AnalyticsService {
    events: std::sync::Arc<dyn crate::domain::ports::EventRepository>,
}

impl AnalyticsService {
    /// Build the service around the event repository.
    pub fn new(events: std::sync::Arc<dyn crate::domain::ports::EventRepository>) -> Self {
        Self { events }
    }

    /// Append one tracking event. The type string is stored verbatim so new
    /// front-end instrumentation needs no backend change.
    pub async fn track(
        &self,
        event_type: &str,
        rsvp_status: Option<bool>,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), crate::domain::DomainError> {
        let event = RsvpEvent {
            id: uuid::Uuid::new_v4(),
            event_type: crate::domain::events::validate_event_type(event_type)?,
            rsvp_status,
            metadata,
            created_at: chrono::Utc::now(),
        };
        self.events.record(&event).await.map_err(|err| {
            tracing::error!(error = %err, "event write failed");
            crate::domain::DomainError::internal("could not store the event")
        })
    }

    /// Aggregate events within the inclusive bounds.
    pub async fn report(
        &self,
        from: Option<chrono::DateTime<chrono::Utc>>,
        to: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<AnalyticsReport, crate::domain::DomainError> {
        let events = self.events.fetch_range(from, to).await.map_err(|err| {
            tracing::error!(error = %err, "event fetch failed");
            crate::domain::DomainError::internal("could not load events")
        })?;
        Ok(aggregate(&events))
    }
}
