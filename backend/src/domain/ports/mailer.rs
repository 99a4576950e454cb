//! Port for transactional email delivery.

use async_trait::async_trait;

/// A fully rendered email ready to hand to a delivery provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Recipient address.
    pub to: String,
    /// Localised subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Provider acknowledgement of an accepted email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailReceipt {
    /// Provider-assigned message id, when the provider returns one.
    pub id: Option<String>,
}

/// Errors raised by mailer adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailerError {
    /// The provider rejected the request.
    #[error("mail provider returned status {status}: {body}")]
    Api {
        /// HTTP status returned by the provider.
        status: u16,
        /// Raw response body, forwarded for diagnosis.
        body: String,
    },
    /// The provider could not be reached.
    #[error("mail transport failed: {message}")]
    Transport {
        /// Adapter-specific failure detail.
        message: String,
    },
}

impl MailerError {
    /// Transport failure with the given detail.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Port for sending confirmation emails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    /// Deliver one rendered email. No retries; the caller decides what a
    /// failure means.
    async fn send(&self, email: &RenderedEmail) -> Result<MailReceipt, MailerError>;
}

/// Fixture mailer that accepts every email and returns a fixed receipt.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMailer;

#[async_trait]
impl ConfirmationMailer for FixtureMailer {
    async fn send(&self, _email: &RenderedEmail) -> Result<MailReceipt, MailerError> {
        Ok(MailReceipt {
            id: Some("fixture-mail".to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_mailer_acknowledges_sends() {
        let receipt = FixtureMailer
            .send(&RenderedEmail {
                to: "guest@example.com".to_owned(),
                subject: "Confirmación".to_owned(),
                html: "<p>hola</p>".to_owned(),
            })
            .await
            .expect("fixture send");

        assert_eq!(receipt.id.as_deref(), Some("fixture-mail"));
    }

    #[rstest]
    fn api_error_carries_the_upstream_body() {
        let err = MailerError::Api {
            status: 422,
            body: "invalid from".to_owned(),
        };
        assert!(err.to_string().contains("422"));
        assert!(err.to_string().contains("invalid from"));
    }
}
