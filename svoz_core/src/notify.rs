//! Collection-day alert delivery over SMTP.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

static SUBJECT: &str = "Dnes je svoz odpadu";

/// Errors from building or using a notification channel.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("notifier configuration error: {0}")]
    Config(String),
}

/// A sink for the ordered list of today's alert lines.
///
/// Delivery is fire-and-forget from the evaluator's point of view: the caller
/// logs a failure and moves on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alerts: &[String]) -> Result<(), NotifyError>;

    /// Human-readable channel name for log lines.
    fn channel_name(&self) -> &str;
}

/// Sends the alert list as one HTML email.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailNotifier {
    /// Build a notifier for an SMTP relay.
    ///
    /// Port 465 connects with implicit TLS, any other port uses STARTTLS.
    /// Credentials are taken from the `SMTP_USERNAME` and `SMTP_PASSWORD`
    /// environment variables when both are set.
    pub fn from_config(
        smtp_host: &str,
        smtp_port: u16,
        from: &str,
        to: &[String],
    ) -> Result<Self, NotifyError> {
        let from_mailbox: Mailbox = from
            .parse()
            .map_err(|err: lettre::address::AddressError| NotifyError::Config(err.to_string()))?;
        let to_mailboxes: Vec<Mailbox> = to
            .iter()
            .map(|addr| {
                addr.parse().map_err(|err: lettre::address::AddressError| {
                    NotifyError::Config(err.to_string())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if to_mailboxes.is_empty() {
            return Err(NotifyError::Config(
                "at least one recipient is required".to_string(),
            ));
        }

        let mut builder = if smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_host)
        }
        .map_err(|err| NotifyError::Config(err.to_string()))?
        .port(smtp_port);
        if let (Ok(username), Ok(password)) =
            (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD"))
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from: from_mailbox,
            to: to_mailboxes,
        })
    }
}

fn render_alert_body(alerts: &[String]) -> String {
    let items: String = alerts
        .iter()
        .map(|alert| format!("<li>{alert}</li>"))
        .collect();
    format!("<p>Dnes se sváží následující druhy odpadu:</p>\n<ul>{items}</ul>")
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, alerts: &[String]) -> Result<(), NotifyError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(SUBJECT)
            .header(ContentType::TEXT_HTML);
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }
        let email = builder
            .body(render_alert_body(alerts))
            .map_err(|err| NotifyError::Smtp(err.to_string()))?;
        self.transport
            .send(email)
            .await
            .map_err(|err| NotifyError::Smtp(err.to_string()))?;
        tracing::info!(recipients = self.to.len(), "collection-day alert delivered");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_valid() {
        let notifier = EmailNotifier::from_config(
            "smtp.seznam.cz",
            465,
            "Svoz odpadů <svoz@example.com>",
            &["obec@example.com".to_string()],
        );
        assert!(notifier.is_ok());
        assert_eq!(notifier.unwrap().channel_name(), "email");
    }

    #[test]
    fn test_from_config_invalid_sender() {
        let result =
            EmailNotifier::from_config("smtp.seznam.cz", 465, "not-an-address", &["obec@example.com".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_config_invalid_recipient() {
        let result = EmailNotifier::from_config(
            "smtp.seznam.cz",
            465,
            "svoz@example.com",
            &["not-an-address".to_string()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_config_requires_a_recipient() {
        let result = EmailNotifier::from_config("smtp.seznam.cz", 465, "svoz@example.com", &[]);
        let err = result.err().unwrap().to_string();
        assert!(err.contains("at least one recipient"));
    }

    #[test]
    fn test_from_config_starttls_port() {
        let notifier = EmailNotifier::from_config(
            "smtp.example.com",
            587,
            "svoz@example.com",
            &["obec@example.com".to_string()],
        );
        assert!(notifier.is_ok());
    }

    #[test]
    fn test_render_alert_body_lists_every_alert() {
        let body = render_alert_body(&[
            "Papír: 15.10.2025 (St)".to_string(),
            "Bioodpad: 15.10.2025 (St)".to_string(),
        ]);
        assert!(body.starts_with("<p>Dnes se sváží"));
        assert!(body.contains("<li>Papír: 15.10.2025 (St)</li>"));
        assert!(body.contains("<li>Bioodpad: 15.10.2025 (St)</li>"));
    }
}
