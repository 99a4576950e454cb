//! Diesel row types and their conversions to domain entities.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::events::RsvpEvent;
use crate::domain::guest::Guest;
use crate::domain::song::SongSuggestion;
use crate::domain::Language;

use super::schema::{guests, rsvp_events, song_suggestions};

/// Database row for a guest.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = guests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
// Updates overwrite the whole row, so None must clear the column.
#[diesel(treat_none_as_null = true)]
pub struct GuestRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rsvp_status: Option<bool>,
    pub plus_one: bool,
    pub plus_one_name: Option<String>,
    pub children_count: i32,
    pub children_needs: Option<String>,
    pub dietary_reqs: Option<String>,
    pub language: String,
    pub bus_ida: bool,
    pub bus_vuelta: bool,
    pub barco_ida: bool,
    pub barco_vuelta: bool,
    pub preboda: bool,
    pub table_id: Option<i32>,
    pub song_request: Option<String>,
    pub song_processed: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Guest> for GuestRow {
    fn from(guest: &Guest) -> Self {
        Self {
            id: guest.id,
            first_name: guest.first_name.clone(),
            last_name: guest.last_name.clone(),
            email: guest.email.clone(),
            rsvp_status: guest.rsvp_status,
            plus_one: guest.plus_one,
            plus_one_name: guest.plus_one_name.clone(),
            children_count: guest.children_count,
            children_needs: guest.children_needs.clone(),
            dietary_reqs: guest.dietary_reqs.clone(),
            language: guest.language.code().to_owned(),
            bus_ida: guest.bus_ida,
            bus_vuelta: guest.bus_vuelta,
            barco_ida: guest.barco_ida,
            barco_vuelta: guest.barco_vuelta,
            preboda: guest.preboda,
            table_id: guest.table_id,
            song_request: guest.song_request.clone(),
            song_processed: guest.song_processed,
            notes: guest.notes.clone(),
            created_at: guest.created_at,
        }
    }
}

impl From<GuestRow> for Guest {
    fn from(row: GuestRow) -> Self {
        // Stored codes outside the supported set fall back to Spanish.
        let language = Language::normalise(&row.language);
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            rsvp_status: row.rsvp_status,
            plus_one: row.plus_one,
            plus_one_name: row.plus_one_name,
            children_count: row.children_count,
            children_needs: row.children_needs,
            dietary_reqs: row.dietary_reqs,
            language,
            bus_ida: row.bus_ida,
            bus_vuelta: row.bus_vuelta,
            barco_ida: row.barco_ida,
            barco_vuelta: row.barco_vuelta,
            preboda: row.preboda,
            table_id: row.table_id,
            song_request: row.song_request,
            song_processed: row.song_processed,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Database row for a song suggestion.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = song_suggestions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SongSuggestionRow {
    pub id: Uuid,
    pub song: String,
    pub processed: bool,
    pub guest_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&SongSuggestion> for SongSuggestionRow {
    fn from(suggestion: &SongSuggestion) -> Self {
        Self {
            id: suggestion.id,
            song: suggestion.song.clone(),
            processed: suggestion.processed,
            guest_id: suggestion.guest_id,
            created_at: suggestion.created_at,
        }
    }
}

impl From<SongSuggestionRow> for SongSuggestion {
    fn from(row: SongSuggestionRow) -> Self {
        Self {
            id: row.id,
            song: row.song,
            processed: row.processed,
            guest_id: row.guest_id,
            created_at: row.created_at,
        }
    }
}

/// Database row for a tracked event.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = rsvp_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RsvpEventRow {
    pub id: Uuid,
    pub event_type: String,
    pub rsvp_status: Option<bool>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<&RsvpEvent> for RsvpEventRow {
    fn from(event: &RsvpEvent) -> Self {
        Self {
            id: event.id,
            event_type: event.event_type.clone(),
            rsvp_status: event.rsvp_status,
            metadata: event.metadata.clone(),
            created_at: event.created_at,
        }
    }
}

impl From<RsvpEventRow> for RsvpEvent {
    fn from(row: RsvpEventRow) -> Self {
        Self {
            id: row.id,
            event_type: row.event_type,
            rsvp_status: row.rsvp_status,
            metadata: row.metadata,
            created_at: row.created_at,
        }
    }
}
