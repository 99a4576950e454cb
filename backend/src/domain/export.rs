//! CSV export of the guest list.
//!
//! The output format is a contract with the couple's spreadsheet workflow:
//! UTF-8 with a BOM so Excel detects the encoding, Spanish headers in fixed
//! order, every field double-quoted with embedded quotes doubled, `\n` line
//! endings, dates as `dd/mm/yy`.

use crate::domain::guest::Guest;

const BOM: &str = "\u{feff}";

const HEADERS: [&str; 14] = [
    "Nombre",
    "Apellidos",
    "Email",
    "Asistencia",
    "Pareja",
    "Nombre Pareja",
    "Niños",
    "Notas Niños",
    "Alergias/Dieta",
    "Canción",
    "Idioma",
    "Fecha Registro",
    "Bus",
    "Preboda",
];

/// Render the guest list as CSV.
///
/// Legacy anonymous suggestion rows are skipped; they are not guests.
pub fn render_csv(guests: &[Guest]) -> String {
    let mut out = String::from(BOM);
    out.push_str(&csv_line(HEADERS.iter().copied()));
    for guest in guests.iter().filter(|g| !g.is_anonymous_suggestion()) {
        out.push_str(&csv_line(guest_fields(guest).iter().map(String::as_str)));
    }
    out
}

fn guest_fields(guest: &Guest) -> [String; 14] {
    let attendance = match guest.rsvp_status {
        Some(true) => "Sí",
        Some(false) => "No",
        None => "Pendiente",
    };
    let uses_bus = guest.bus_ida || guest.bus_vuelta;
    [
        guest.first_name.clone(),
        guest.last_name.clone(),
        guest.email.clone(),
        attendance.to_owned(),
        si_no(guest.plus_one),
        guest.plus_one_name.clone().unwrap_or_default(),
        guest.children_count.to_string(),
        guest.children_needs.clone().unwrap_or_default(),
        guest.dietary_reqs.clone().unwrap_or_default(),
        guest.song_request.clone().unwrap_or_default(),
        guest.language.code().to_owned(),
        guest.created_at.format("%d/%m/%y").to_string(),
        si_no(uses_bus),
        si_no(guest.preboda),
    ]
}

fn si_no(flag: bool) -> String {
    if flag { "Sí" } else { "No" }.to_owned()
}

fn csv_line<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = fields
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect();
    let mut line = quoted.join(",");
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::guest::fixtures::{confirmed_guest, sentinel_suggestion_row};
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn output_starts_with_a_bom_and_the_fixed_headers() {
        let csv = render_csv(&[]);
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv.contains("\"Nombre\",\"Apellidos\",\"Email\""));
        assert!(csv.ends_with("\"Preboda\"\n"));
    }

    #[rstest]
    fn embedded_quotes_are_doubled() {
        let mut guest = confirmed_guest("María", "García", None);
        guest.dietary_reqs = Some("sin \"gluten\"".to_owned());

        let csv = render_csv(&[guest]);
        assert!(csv.contains("\"sin \"\"gluten\"\"\""));
    }

    #[rstest]
    fn attendance_renders_the_three_states() {
        let confirmed = confirmed_guest("Ana", "Ruiz", None);
        let mut declined = confirmed_guest("Eva", "Sanz", None);
        declined.rsvp_status = Some(false);
        let mut pending = confirmed_guest("Luz", "Vega", None);
        pending.rsvp_status = None;

        let csv = render_csv(&[confirmed, declined, pending]);
        assert!(csv.contains("\"Sí\""));
        assert!(csv.contains("\"No\""));
        assert!(csv.contains("\"Pendiente\""));
    }

    #[rstest]
    fn dates_render_day_month_short_year() {
        let mut guest = confirmed_guest("Ana", "Ruiz", None);
        guest.created_at = chrono::Utc
            .with_ymd_and_hms(2026, 3, 7, 12, 0, 0)
            .single()
            .expect("valid timestamp");

        let csv = render_csv(&[guest]);
        assert!(csv.contains("\"07/03/26\""));
    }

    #[rstest]
    fn children_notes_come_from_children_needs_and_bus_covers_both_legs() {
        let mut guest = confirmed_guest("Ana", "Ruiz", None);
        guest.children_count = 1;
        guest.children_needs = Some("trona".to_owned());
        guest.notes = Some("interno".to_owned());
        guest.bus_ida = false;
        guest.bus_vuelta = true;

        let csv = render_csv(&[guest]);
        let row: Vec<&str> = csv.lines().nth(1).expect("guest row").split(',').collect();
        assert_eq!(row[7], "\"trona\"");
        assert_eq!(row[12], "\"Sí\"");
        assert!(!csv.contains("interno"));
    }

    #[rstest]
    fn sentinel_rows_are_excluded() {
        let csv = render_csv(&[sentinel_suggestion_row("Bohemian Rhapsody")]);
        assert!(!csv.contains("suggestion.local"));
        assert_eq!(csv.lines().count(), 1);
    }

    #[rstest]
    fn lines_end_with_plain_newlines() {
        let csv = render_csv(&[confirmed_guest("Ana", "Ruiz", None)]);
        assert!(!csv.contains('\r'));
        assert_eq!(csv.lines().count(), 2);
    }
}
