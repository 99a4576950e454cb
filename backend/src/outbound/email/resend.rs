//! Resend delivery adapter.
//!
//! One POST to `https://api.resend.com/emails` per email. The provider's
//! response body is forwarded on rejection so the caller can surface it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{ConfirmationMailer, MailReceipt, MailerError, RenderedEmail};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Mailer that delivers through the Resend HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
    endpoint: String,
}

impl ResendMailer {
    /// Build the mailer with the given API key and sender address.
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            from: from.into(),
            endpoint: RESEND_ENDPOINT.to_owned(),
        }
    }

    /// Point the mailer at a different endpoint. Used by tests against a
    /// local stub server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl ConfirmationMailer for ResendMailer {
    async fn send(&self, email: &RenderedEmail) -> Result<MailReceipt, MailerError> {
        let request = SendRequest {
            from: &self.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| MailerError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "mail provider rejected the request");
            return Err(MailerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: SendResponse = response
            .json()
            .await
            .map_err(|err| MailerError::transport(err.to_string()))?;

        Ok(MailReceipt { id: body.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn request_body_matches_the_provider_contract() {
        let request = SendRequest {
            from: "Irene & Marco <boda@example.com>",
            to: ["guest@example.com"],
            subject: "Confirmación recibida",
            html: "<p>hola</p>",
        };

        let json = serde_json::to_value(&request).expect("serialise");
        assert_eq!(json["from"], "Irene & Marco <boda@example.com>");
        assert_eq!(json["to"][0], "guest@example.com");
        assert_eq!(json["subject"], "Confirmación recibida");
        assert_eq!(json["html"], "<p>hola</p>");
    }

    #[rstest]
    fn response_id_is_optional() {
        let parsed: SendResponse = serde_json::from_str("{}").expect("parse");
        assert_eq!(parsed.id, None);

        let parsed: SendResponse =
            serde_json::from_str(r#"{"id":"re_123"}"#).expect("parse");
        assert_eq!(parsed.id.as_deref(), Some("re_123"));
    }
}
