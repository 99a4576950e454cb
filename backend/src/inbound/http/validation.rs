//! Request parsing helpers shared by HTTP handlers.

use chrono::{DateTime, Utc};

use crate::domain::DomainError;

/// Parse an optional RFC 3339 timestamp query parameter.
pub fn parse_rfc3339(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, DomainError> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|_| {
                    DomainError::invalid_field(
                        field,
                        format!("{field} must be an RFC 3339 timestamp"),
                    )
                })
        })
        .transpose()
}
