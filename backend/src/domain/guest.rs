//! Guest entity and RSVP submission validation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{DomainError, Language};

/// Email suffix used by the legacy music section to park anonymous song
/// suggestions inside the guest table.
pub const ANONYMOUS_EMAIL_SUFFIX: &str = "@suggestion.local";

/// Placeholder first names used by the same legacy rows.
const ANONYMOUS_FIRST_NAMES: [&str; 2] = ["Anónimo", "Anónimo Sugerencia"];

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 255;
const MAX_PLUS_ONE_NAME_LEN: usize = 200;
const MAX_DIETARY_LEN: usize = 500;

/// One invited person's registration and preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    /// Row identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Surname; the admin list sorts on it.
    pub last_name: String,
    /// Addressing key for the update-vs-insert RSVP flow.
    pub email: String,
    /// `None` while the guest has not answered.
    pub rsvp_status: Option<bool>,
    /// Whether the guest brings a companion.
    pub plus_one: bool,
    /// Companion name, when given.
    pub plus_one_name: Option<String>,
    /// Number of children attending.
    pub children_count: i32,
    /// Free-text needs for the children.
    pub children_needs: Option<String>,
    /// Allergies and dietary notes.
    pub dietary_reqs: Option<String>,
    /// Preferred language for communications.
    pub language: Language,
    /// Outbound bus opt-in.
    pub bus_ida: bool,
    /// Return bus opt-in.
    pub bus_vuelta: bool,
    /// Outbound boat opt-in.
    pub barco_ida: bool,
    /// Return boat opt-in.
    pub barco_vuelta: bool,
    /// Pre-wedding event opt-in.
    pub preboda: bool,
    /// Assigned table, `None` until seating is decided.
    pub table_id: Option<i32>,
    /// Song the guest asked for.
    pub song_request: Option<String>,
    /// Whether the song request made it onto the playlist.
    pub song_processed: bool,
    /// Coordination notes.
    pub notes: Option<String>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl Guest {
    /// Whether this row is a legacy anonymous song suggestion rather than a
    /// real guest. Such rows are excluded from counters and exports.
    pub fn is_anonymous_suggestion(&self) -> bool {
        self.email.ends_with(ANONYMOUS_EMAIL_SUFFIX)
            || ANONYMOUS_FIRST_NAMES.contains(&self.first_name.as_str())
    }

    /// Whether the guest left a non-blank song request.
    pub fn has_song_request(&self) -> bool {
        self.song_request
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    /// Whether the guest left non-blank dietary notes.
    pub fn has_dietary_notes(&self) -> bool {
        self.dietary_reqs
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}

/// A raw RSVP form submission before validation.
#[derive(Debug, Clone, Default)]
pub struct RsvpSubmission {
    /// Given name as typed.
    pub first_name: String,
    /// Surname as typed.
    pub last_name: String,
    /// Email as typed.
    pub email: String,
    /// The binary attendance choice. Required; `None` means the field was
    /// never answered and the submission is rejected.
    pub attending: Option<bool>,
    /// Plus-one toggle.
    pub plus_one: bool,
    /// Companion name.
    pub plus_one_name: Option<String>,
    /// Children attending.
    pub children_count: i32,
    /// Children needs text.
    pub children_needs: Option<String>,
    /// Dietary text.
    pub dietary_reqs: Option<String>,
    /// Outbound bus opt-in.
    pub bus_ida: bool,
    /// Return bus opt-in.
    pub bus_vuelta: bool,
    /// Outbound boat opt-in.
    pub barco_ida: bool,
    /// Return boat opt-in.
    pub barco_vuelta: bool,
    /// Pre-wedding opt-in.
    pub preboda: bool,
    /// Submission language.
    pub language: Language,
}

/// A submission that passed validation, with attending-only fields cleared
/// for declining guests.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRsvp {
    /// Trimmed given name.
    pub first_name: String,
    /// Trimmed surname.
    pub last_name: String,
    /// Trimmed email.
    pub email: String,
    /// The attendance choice.
    pub attending: bool,
    /// Plus-one toggle, always `false` for declining guests.
    pub plus_one: bool,
    /// Companion name.
    pub plus_one_name: Option<String>,
    /// Children attending.
    pub children_count: i32,
    /// Children needs text.
    pub children_needs: Option<String>,
    /// Dietary text.
    pub dietary_reqs: Option<String>,
    /// Outbound bus opt-in.
    pub bus_ida: bool,
    /// Return bus opt-in.
    pub bus_vuelta: bool,
    /// Outbound boat opt-in.
    pub barco_ida: bool,
    /// Return boat opt-in.
    pub barco_vuelta: bool,
    /// Pre-wedding opt-in.
    pub preboda: bool,
    /// Submission language.
    pub language: Language,
}

impl RsvpSubmission {
    /// Validate the submission.
    ///
    /// Field errors carry the offending camelCase field name in
    /// `details.field` so the form can highlight it. No validation failure
    /// ever reaches a repository.
    pub fn validate(self) -> Result<ValidRsvp, DomainError> {
        let first_name = required_name(&self.first_name, "firstName")?;
        let last_name = required_name(&self.last_name, "lastName")?;
        let email = valid_email(&self.email)?;
        let attending = self
            .attending
            .ok_or_else(|| DomainError::invalid_field("rsvpStatus", "attendance choice is required"))?;

        let plus_one_name = trimmed_optional(self.plus_one_name.as_deref());
        if let Some(name) = plus_one_name.as_deref() {
            if name.chars().count() > MAX_PLUS_ONE_NAME_LEN {
                return Err(DomainError::invalid_field(
                    "plusOneName",
                    format!("plusOneName must be at most {MAX_PLUS_ONE_NAME_LEN} characters"),
                ));
            }
        }
        let dietary_reqs = trimmed_optional(self.dietary_reqs.as_deref());
        if let Some(text) = dietary_reqs.as_deref() {
            if text.chars().count() > MAX_DIETARY_LEN {
                return Err(DomainError::invalid_field(
                    "dietaryReqs",
                    format!("dietaryReqs must be at most {MAX_DIETARY_LEN} characters"),
                ));
            }
        }
        if self.children_count < 0 {
            return Err(DomainError::invalid_field(
                "childrenCount",
                "childrenCount must not be negative",
            ));
        }

        let valid = if attending {
            ValidRsvp {
                first_name,
                last_name,
                email,
                attending,
                plus_one: self.plus_one,
                plus_one_name: if self.plus_one { plus_one_name } else { None },
                children_count: self.children_count,
                children_needs: trimmed_optional(self.children_needs.as_deref()),
                dietary_reqs,
                bus_ida: self.bus_ida,
                bus_vuelta: self.bus_vuelta,
                barco_ida: self.barco_ida,
                barco_vuelta: self.barco_vuelta,
                preboda: self.preboda,
                language: self.language,
            }
        } else {
            // Declining guests carry none of the attending-only details.
            ValidRsvp {
                first_name,
                last_name,
                email,
                attending,
                plus_one: false,
                plus_one_name: None,
                children_count: 0,
                children_needs: None,
                dietary_reqs: None,
                bus_ida: false,
                bus_vuelta: false,
                barco_ida: false,
                barco_vuelta: false,
                preboda: false,
                language: self.language,
            }
        };
        Ok(valid)
    }
}

impl ValidRsvp {
    /// Materialise a fresh guest row from this submission.
    pub fn into_new_guest(self, id: Uuid, created_at: DateTime<Utc>) -> Guest {
        Guest {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            rsvp_status: Some(self.attending),
            plus_one: self.plus_one,
            plus_one_name: self.plus_one_name,
            children_count: self.children_count,
            children_needs: self.children_needs,
            dietary_reqs: self.dietary_reqs,
            language: self.language,
            bus_ida: self.bus_ida,
            bus_vuelta: self.bus_vuelta,
            barco_ida: self.barco_ida,
            barco_vuelta: self.barco_vuelta,
            preboda: self.preboda,
            table_id: None,
            song_request: None,
            song_processed: false,
            notes: None,
            created_at,
        }
    }

    /// Overwrite an existing guest row with this submission's snapshot,
    /// preserving identity, seating, song triage state, and notes.
    pub fn apply_to(self, guest: &mut Guest) {
        guest.first_name = self.first_name;
        guest.last_name = self.last_name;
        guest.rsvp_status = Some(self.attending);
        guest.plus_one = self.plus_one;
        guest.plus_one_name = self.plus_one_name;
        guest.children_count = self.children_count;
        guest.children_needs = self.children_needs;
        guest.dietary_reqs = self.dietary_reqs;
        guest.language = self.language;
        guest.bus_ida = self.bus_ida;
        guest.bus_vuelta = self.bus_vuelta;
        guest.barco_ida = self.barco_ida;
        guest.barco_vuelta = self.barco_vuelta;
        guest.preboda = self.preboda;
    }
}

fn required_name(raw: &str, field: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_field(
            field,
            format!("missing required field: {field}"),
        ));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::invalid_field(
            field,
            format!("{field} must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(trimmed.to_owned())
}

fn valid_email(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_field(
            "email",
            "missing required field: email",
        ));
    }
    if trimmed.len() > MAX_EMAIL_LEN || !is_email_shaped(trimmed) {
        return Err(DomainError::invalid_field(
            "email",
            "email must be a valid address",
        ));
    }
    Ok(trimmed.to_owned())
}

/// Syntactic email check: one `@` separating a non-empty local part from a
/// dotted domain, with no whitespace anywhere.
fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

fn trimmed_optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn submission() -> RsvpSubmission {
        RsvpSubmission {
            first_name: "Irene".to_owned(),
            last_name: "García".to_owned(),
            email: "irene@example.com".to_owned(),
            attending: Some(true),
            ..RsvpSubmission::default()
        }
    }

    #[rstest]
    #[case("", "firstName")]
    #[case("   ", "firstName")]
    fn missing_first_name_is_keyed_to_its_field(#[case] name: &str, #[case] field: &str) {
        let mut sub = submission();
        sub.first_name = name.to_owned();

        let err = sub.validate().expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[rstest]
    fn missing_last_name_is_rejected() {
        let mut sub = submission();
        sub.last_name = String::new();

        let err = sub.validate().expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], "lastName");
    }

    #[rstest]
    #[case("not-an-email")]
    #[case("a@b")]
    #[case("two words@example.com")]
    #[case("@example.com")]
    #[case("user@")]
    fn malformed_emails_are_rejected(#[case] email: &str) {
        let mut sub = submission();
        sub.email = email.to_owned();

        let err = sub.validate().expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], "email");
    }

    #[rstest]
    fn attendance_has_no_default() {
        let mut sub = submission();
        sub.attending = None;

        let err = sub.validate().expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], "rsvpStatus");
    }

    #[rstest]
    fn names_longer_than_the_cap_are_rejected() {
        let mut sub = submission();
        sub.first_name = "x".repeat(101);

        let err = sub.validate().expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], "firstName");
    }

    #[rstest]
    fn declining_clears_attending_only_fields() {
        let mut sub = submission();
        sub.attending = Some(false);
        sub.plus_one = true;
        sub.plus_one_name = Some("Marco".to_owned());
        sub.children_count = 2;
        sub.dietary_reqs = Some("vegan".to_owned());
        sub.bus_ida = true;
        sub.preboda = true;

        let valid = sub.validate().expect("valid");
        assert!(!valid.attending);
        assert!(!valid.plus_one);
        assert_eq!(valid.plus_one_name, None);
        assert_eq!(valid.children_count, 0);
        assert_eq!(valid.dietary_reqs, None);
        assert!(!valid.bus_ida);
        assert!(!valid.preboda);
    }

    #[rstest]
    fn plus_one_name_is_dropped_without_the_toggle() {
        let mut sub = submission();
        sub.plus_one = false;
        sub.plus_one_name = Some("Marco".to_owned());

        let valid = sub.validate().expect("valid");
        assert_eq!(valid.plus_one_name, None);
    }

    #[rstest]
    fn fields_are_trimmed() {
        let mut sub = submission();
        sub.first_name = "  Irene ".to_owned();
        sub.email = " irene@example.com ".to_owned();

        let valid = sub.validate().expect("valid");
        assert_eq!(valid.first_name, "Irene");
        assert_eq!(valid.email, "irene@example.com");
    }

    #[rstest]
    fn sentinel_rows_are_detected_by_suffix_and_placeholder() {
        let row = fixtures::sentinel_suggestion_row("Bohemian Rhapsody");
        assert!(row.is_anonymous_suggestion());

        let guest = fixtures::confirmed_guest("Lucía", "Pérez", Some(3));
        assert!(!guest.is_anonymous_suggestion());
    }

    #[rstest]
    fn update_preserves_identity_and_triage_state() {
        let mut existing = fixtures::confirmed_guest("Lucía", "Pérez", Some(5));
        existing.song_request = Some("Vivaldi".to_owned());
        existing.song_processed = true;
        let id = existing.id;

        let valid = submission().validate().expect("valid");
        valid.apply_to(&mut existing);

        assert_eq!(existing.id, id);
        assert_eq!(existing.table_id, Some(5));
        assert_eq!(existing.song_request.as_deref(), Some("Vivaldi"));
        assert!(existing.song_processed);
        assert_eq!(existing.first_name, "Irene");
    }
}
