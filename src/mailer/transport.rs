use crate::core::config::SmtpConfig;
use crate::core::error::DeliveryError;
use crate::mailer::composer::OutboundMessage;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// Boundary to the SMTP-capable mail transport.
///
/// The dispatcher only depends on this trait, so tests can substitute a
/// recording or failing transport.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}

/// Production transport over STARTTLS SMTP.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    /// Build the transport from configuration. The timeout bounds every
    /// send attempt so a dead relay never hangs a request indefinitely.
    pub fn new(config: &SmtpConfig, from_address: String) -> Result<Self, DeliveryError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(config.timeout_seconds)))
            .build();

        Ok(Self {
            transport,
            from_address,
        })
    }

    fn build_mime(&self, message: &OutboundMessage) -> Result<Message, DeliveryError> {
        let from: Mailbox = format!("{} <{}>", message.from_name, self.from_address)
            .parse()
            .map_err(|_| DeliveryError::Address(self.from_address.clone()))?;

        let to: Mailbox = message
            .to
            .parse()
            .map_err(|_| DeliveryError::Address(message.to.clone()))?;

        let mut body = MultiPart::mixed().singlepart(SinglePart::html(message.html_body.clone()));

        for attachment in &message.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| DeliveryError::Build(e.to_string()))?;

            body = body.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.bytes.clone(), content_type),
            );
        }

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .multipart(body)
            .map_err(|e| DeliveryError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let mime = self.build_mime(message)?;

        self.transport
            .send(mime)
            .await
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::composer::Attachment as ComposedAttachment;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "mailer@example.com".to_string(),
            password: "secret".to_string(),
            timeout_seconds: 10,
        }
    }

    fn sample_message(to: &str) -> OutboundMessage {
        OutboundMessage {
            from_name: "Canton Fair Notification".to_string(),
            to: to.to_string(),
            subject: "New Registration from Asha (Pass ID: 0007)".to_string(),
            html_body: "<p>details</p>".to_string(),
            attachments: vec![ComposedAttachment {
                filename: "payment.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![1, 2, 3],
            }],
        }
    }

    #[test]
    fn test_build_mime_with_attachment() {
        let mailer = SmtpMailer::new(&smtp_config(), "mailer@example.com".to_string()).unwrap();

        let mime = mailer.build_mime(&sample_message("admin@example.com")).unwrap();
        let rendered = String::from_utf8(mime.formatted()).unwrap();

        assert!(rendered.contains("To: admin@example.com"));
        assert!(rendered.contains("Subject: New Registration from Asha"));
        assert!(rendered.contains("payment.png"));
    }

    #[test]
    fn test_invalid_recipient_is_an_address_error() {
        let mailer = SmtpMailer::new(&smtp_config(), "mailer@example.com".to_string()).unwrap();

        let result = mailer.build_mime(&sample_message("not an address"));
        assert!(matches!(result, Err(DeliveryError::Address(_))));
    }
}
