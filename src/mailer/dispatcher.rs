use crate::core::error::DeliveryError;
use crate::mailer::composer::OutboundMessage;
use crate::mailer::transport::MailTransport;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Sends composed messages one at a time through the transport.
pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
    send_pause: Duration,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, send_pause: Duration) -> Self {
        Self {
            transport,
            send_pause,
        }
    }

    /// Send every message in order, pausing between consecutive sends so
    /// bursty providers do not throttle the second delivery. The first
    /// failure aborts the remainder; nothing is retried.
    pub async fn dispatch(&self, messages: &[OutboundMessage]) -> Result<(), DeliveryError> {
        for (index, message) in messages.iter().enumerate() {
            if index > 0 && !self.send_pause.is_zero() {
                tokio::time::sleep(self.send_pause).await;
            }

            debug!(to = %message.to, subject = %message.subject, "Sending message");
            self.transport.send(message).await?;
        }

        Ok(())
    }
}
