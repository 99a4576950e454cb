//! Confirmation email rendering and dispatch.
//!
//! Rendering is pure: a guest snapshot plus site settings produce a
//! [`RenderedEmail`]. The snapshot parser tolerates the database-webhook
//! envelope and the historical string form of the attendance flag.

use std::sync::Arc;

use serde_json::Value;
use tracing::error;

use crate::domain::ports::{ConfirmationMailer, MailReceipt, MailerError, RenderedEmail};
use crate::domain::{DomainError, Language};

/// Site-wide settings the templates interpolate.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    /// Public site URL for the back-to-website link.
    pub site_url: String,
    /// Gift IBAN rendered in the attending template.
    pub gift_iban: String,
}

/// The guest fields the templates consume.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailGuestSnapshot {
    /// Recipient address.
    pub email: String,
    /// Greeting name.
    pub first_name: String,
    /// Template language.
    pub language: Language,
    /// Whether the attending template applies.
    pub attending: bool,
    /// Outbound bus opt-in.
    pub bus_ida: bool,
    /// Return bus opt-in.
    pub bus_vuelta: bool,
    /// Outbound boat opt-in.
    pub barco_ida: bool,
    /// Return boat opt-in.
    pub barco_vuelta: bool,
    /// Dietary text.
    pub dietary_reqs: Option<String>,
    /// Pre-wedding opt-in.
    pub preboda: bool,
    /// Plus-one toggle.
    pub plus_one: bool,
    /// Companion name.
    pub plus_one_name: Option<String>,
    /// Children attending.
    pub children_count: i32,
    /// Children needs text.
    pub children_needs: Option<String>,
}

impl EmailGuestSnapshot {
    /// Parse a request payload into a snapshot.
    ///
    /// The payload is either a bare guest object or wrapped in a webhook
    /// envelope under `record`. `email` and `first_name` are required; the
    /// attendance flag accepts a JSON boolean or its string form, and
    /// anything that is not `true` selects the declining template.
    pub fn from_payload(payload: &Value) -> Result<Self, DomainError> {
        let record = payload.get("record").unwrap_or(payload);

        let email = non_blank_str(record, "email")
            .ok_or_else(|| DomainError::invalid_field("email", "missing required field: email"))?;
        let first_name = non_blank_str(record, "first_name").ok_or_else(|| {
            DomainError::invalid_field("firstName", "missing required field: first_name")
        })?;

        let language = record
            .get("language")
            .and_then(Value::as_str)
            .map(Language::normalise)
            .unwrap_or_default();

        // Tolerates the historical string form of the flag; anything that
        // is not true selects the declining template.
        let attending = match record.get("rsvp_status") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(s)) => s == "true",
            _ => false,
        };

        Ok(Self {
            email,
            first_name,
            language,
            attending,
            bus_ida: flag(record, "bus_ida"),
            bus_vuelta: flag(record, "bus_vuelta"),
            barco_ida: flag(record, "barco_ida"),
            barco_vuelta: flag(record, "barco_vuelta"),
            dietary_reqs: non_blank_str(record, "dietary_reqs"),
            preboda: flag(record, "preboda"),
            plus_one: flag(record, "plus_one"),
            plus_one_name: non_blank_str(record, "plus_one_name"),
            children_count: record
                .get("children_count")
                .and_then(Value::as_i64)
                .and_then(|n| i32::try_from(n).ok())
                .unwrap_or(0),
            children_needs: non_blank_str(record, "children_needs"),
        })
    }
}

fn non_blank_str(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn flag(record: &Value, key: &str) -> bool {
    record.get(key).and_then(Value::as_bool).unwrap_or(false)
}

struct Translations {
    subject: &'static str,
    title: &'static str,
    greeting: &'static str,
    intro: &'static str,
    summary_title: &'static str,
    bus: &'static str,
    boat: &'static str,
    outbound: &'static str,
    return_leg: &'static str,
    dietary: &'static str,
    none: &'static str,
    prewedding: &'static str,
    yes: &'static str,
    no: &'static str,
    plus_one: &'static str,
    children: &'static str,
    children_needs: &'static str,
    gift_title: &'static str,
    gift_intro: &'static str,
    decline_title: &'static str,
    decline_body: &'static str,
    closing: &'static str,
    back_to_web: &'static str,
    footer: &'static str,
}

fn translations(language: Language) -> &'static Translations {
    match language {
        Language::It => &Translations {
            subject: "Conferma ricevuta – Irene & Marco 2026",
            title: "Grazie per aver confermato!",
            greeting: "Ciao",
            intro: "Siamo molto felici che possiate accompagnarci nel nostro grande giorno. Abbiamo ricevuto correttamente la vostra conferma.",
            summary_title: "Riepilogo",
            bus: "Autobus",
            boat: "Barca",
            outbound: "Andata",
            return_leg: "Ritorno",
            dietary: "Esigenze alimentari",
            none: "Nessuna",
            prewedding: "Pre-matrimonio",
            yes: "Sì",
            no: "No",
            plus_one: "Accompagnatore",
            children: "Bambini",
            children_needs: "Esigenze bambini",
            gift_title: "Regalo",
            gift_intro: "Se desiderate farci un regalo, potete usare questo IBAN:",
            decline_title: "Grazie per avercelo fatto sapere",
            decline_body: "Ci dispiace che non possiate venire. Vi terremo nel cuore quel giorno.",
            closing: "Non vediamo l'ora di vedervi! 💛",
            back_to_web: "Torna al sito",
            footer: "Con amore, Irene & Marco",
        },
        Language::En => &Translations {
            subject: "Confirmation received – Irene & Marco 2026",
            title: "Thank you for confirming!",
            greeting: "Hi",
            intro: "We are so happy you can join us on our special day. We have received your confirmation successfully.",
            summary_title: "Summary",
            bus: "Bus",
            boat: "Boat",
            outbound: "Outbound",
            return_leg: "Return",
            dietary: "Dietary requirements",
            none: "None",
            prewedding: "Pre-wedding",
            yes: "Yes",
            no: "No",
            plus_one: "Plus one",
            children: "Children",
            children_needs: "Children's needs",
            gift_title: "Gift",
            gift_intro: "If you would like to give us a gift, you can use this IBAN:",
            decline_title: "Thank you for letting us know",
            decline_body: "We are sorry you cannot make it. We will be thinking of you on the day.",
            closing: "We can't wait to see you! 💛",
            back_to_web: "Back to website",
            footer: "With love, Irene & Marco",
        },
        Language::Es => &Translations {
            subject: "Confirmación recibida – Irene & Marco 2026",
            title: "¡Gracias por confirmar!",
            greeting: "¡Hola",
            intro: "Estamos muy felices de que podáis acompañarnos en nuestro gran día. Hemos recibido correctamente vuestra confirmación.",
            summary_title: "Resumen",
            bus: "Autobús",
            boat: "Barco",
            outbound: "Ida",
            return_leg: "Vuelta",
            dietary: "Requisitos dietéticos",
            none: "Ninguno",
            prewedding: "Pre-boda",
            yes: "Sí",
            no: "No",
            plus_one: "Acompañante",
            children: "Niños",
            children_needs: "Necesidades niños",
            gift_title: "Regalo",
            gift_intro: "Si queréis hacernos un regalo, podéis usar este IBAN:",
            decline_title: "Gracias por avisarnos",
            decline_body: "Sentimos mucho que no podáis venir. Os tendremos presentes ese día.",
            closing: "¡Estamos deseando veros! 💛",
            back_to_web: "Volver a la web",
            footer: "Con cariño, Irene & Marco",
        },
    }
}

/// Render the confirmation email for a guest snapshot.
///
/// Template selection depends only on the attendance flag: attending guests
/// get the logistics summary and the gift IBAN block, declining guests a
/// short acknowledgement.
pub fn render_confirmation(
    snapshot: &EmailGuestSnapshot,
    settings: &EmailSettings,
) -> RenderedEmail {
    let t = translations(snapshot.language);
    let body = if snapshot.attending {
        attending_body(snapshot, settings, t)
    } else {
        declining_body(snapshot, t)
    };
    let html = format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head><meta charset=\"UTF-8\"></head>\n\
         <body style=\"margin:0;padding:0;background-color:#FAF7F2;font-family:Georgia,serif;color:#5C4A3A;\">\n\
         <div style=\"max-width:600px;margin:0 auto;padding:40px 20px;\">\n{body}\n\
         <p style=\"text-align:center;\"><a href=\"{site}\" style=\"color:#D4A574;\">{back}</a></p>\n\
         <p style=\"text-align:center;color:#B8A89A;font-style:italic;\">{footer}</p>\n\
         </div>\n</body>\n</html>",
        lang = snapshot.language.code(),
        body = body,
        site = settings.site_url,
        back = t.back_to_web,
        footer = t.footer,
    );
    RenderedEmail {
        to: snapshot.email.clone(),
        subject: t.subject.to_owned(),
        html,
    }
}

fn attending_body(
    snapshot: &EmailGuestSnapshot,
    settings: &EmailSettings,
    t: &Translations,
) -> String {
    let mut rows = Vec::new();
    for (label, outbound, ret) in [
        (t.bus, snapshot.bus_ida, snapshot.bus_vuelta),
        (t.boat, snapshot.barco_ida, snapshot.barco_vuelta),
    ] {
        if outbound || ret {
            let mut legs = Vec::new();
            if outbound {
                legs.push(t.outbound);
            }
            if ret {
                legs.push(t.return_leg);
            }
            rows.push(summary_row(label, &legs.join(" + ")));
        }
    }
    rows.push(summary_row(
        t.dietary,
        snapshot.dietary_reqs.as_deref().unwrap_or(t.none),
    ));
    rows.push(summary_row(
        t.prewedding,
        if snapshot.preboda { t.yes } else { t.no },
    ));
    let plus_one_text = match (&snapshot.plus_one_name, snapshot.plus_one) {
        (Some(name), true) => name.as_str(),
        (_, true) => t.yes,
        _ => t.no,
    };
    rows.push(summary_row(t.plus_one, plus_one_text));
    if snapshot.children_count > 0 {
        rows.push(summary_row(t.children, &snapshot.children_count.to_string()));
        if let Some(needs) = snapshot.children_needs.as_deref() {
            rows.push(summary_row(t.children_needs, needs));
        }
    }

    format!(
        "<h1 style=\"font-weight:400;\">{title}</h1>\n\
         <p>{greeting} {name}!</p>\n<p>{intro}</p>\n\
         <h2 style=\"font-size:16px;text-transform:uppercase;letter-spacing:2px;\">{summary}</h2>\n\
         <table role=\"presentation\" width=\"100%\" style=\"font-size:14px;color:#7A6B5D;\">\n{rows}</table>\n\
         <h2 style=\"font-size:16px;text-transform:uppercase;letter-spacing:2px;\">{gift_title}</h2>\n\
         <p>{gift_intro}</p>\n<p style=\"font-family:monospace;\">{iban}</p>\n\
         <p style=\"text-align:center;\">{closing}</p>",
        title = t.title,
        greeting = t.greeting,
        name = snapshot.first_name,
        intro = t.intro,
        summary = t.summary_title,
        rows = rows.join("\n"),
        gift_title = t.gift_title,
        gift_intro = t.gift_intro,
        iban = settings.gift_iban,
        closing = t.closing,
    )
}

fn declining_body(snapshot: &EmailGuestSnapshot, t: &Translations) -> String {
    format!(
        "<h1 style=\"font-weight:400;\">{title}</h1>\n\
         <p>{greeting} {name}!</p>\n<p>{body}</p>",
        title = t.decline_title,
        greeting = t.greeting,
        name = snapshot.first_name,
        body = t.decline_body,
    )
}

fn summary_row(label: &str, value: &str) -> String {
    format!(
        "<tr><td style=\"padding:8px 0;border-bottom:1px solid #E8E0D8;font-weight:bold;\">{label}</td>\
         <td style=\"padding:8px 0;border-bottom:1px solid #E8E0D8;text-align:right;\">{value}</td></tr>"
    )
}

/// Sends confirmation emails through the configured mailer.
#[derive(Clone)]
pub struct ConfirmationEmailService {
    mailer: Arc<dyn ConfirmationMailer>,
    settings: EmailSettings,
}

impl ConfirmationEmailService {
    /// Build the service around a mailer and site settings.
    pub fn new(mailer: Arc<dyn ConfirmationMailer>, settings: EmailSettings) -> Self {
        Self { mailer, settings }
    }

    /// Render and send the confirmation for a guest snapshot.
    ///
    /// Provider rejections surface the upstream payload in the error
    /// details so the caller can diagnose them.
    pub async fn send(&self, snapshot: &EmailGuestSnapshot) -> Result<MailReceipt, DomainError> {
        let email = render_confirmation(snapshot, &self.settings);
        self.mailer.send(&email).await.map_err(|err| {
            error!(recipient = %snapshot.email, error = %err, "confirmation email failed");
            match err {
                MailerError::Api { status, body } => {
                    DomainError::internal("confirmation email rejected by provider")
                        .with_details(serde_json::json!({ "status": status, "provider": body }))
                }
                MailerError::Transport { .. } => {
                    DomainError::internal("confirmation email could not be delivered")
                }
            }
        })
    }
}
