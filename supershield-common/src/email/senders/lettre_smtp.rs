use async_trait::async_trait;
use lettre::message::{header, Message, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::time::Duration;

use crate::email::{
    EmailError, EmailMessage, SmtpConnector, SmtpCredentials, SmtpSession, TransportCandidate,
};

/// Opens real SMTP sessions with lettre. Implicit TLS for `secure` candidates, otherwise
/// opportunistic STARTTLS.
pub struct LettreConnector {
    timeout: Duration,
}

impl LettreConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl SmtpConnector for LettreConnector {
    fn connect(
        &self,
        candidate: &TransportCandidate,
        credentials: &SmtpCredentials,
    ) -> Result<Box<dyn SmtpSession>, EmailError> {
        let tls_parameters = TlsParameters::new(candidate.host.clone())
            .map_err(|e| EmailError::RelayConnectionFailed(e.to_string()))?;

        let tls = if candidate.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&candidate.host)
            .port(candidate.port)
            .tls(tls)
            .credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();

        Ok(Box::new(LettreSession { transport }))
    }
}

struct LettreSession {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[async_trait]
impl SmtpSession for LettreSession {
    async fn verify(&self) -> Result<(), EmailError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(EmailError::VerificationFailed(
                String::from("Relay did not respond to NOOP"),
                None,
            )),
            Err(e) => Err(EmailError::VerificationFailed(
                e.to_string(),
                smtp_status_code(&e),
            )),
        }
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let message = build_message(message)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| EmailError::FailedToSend(e.to_string(), smtp_status_code(&e)))?;

        Ok(())
    }
}

fn build_message(message: &EmailMessage) -> Result<Message, EmailError> {
    let mut builder = Message::builder()
        .from(message.from.clone())
        .mailbox(header::To::from(message.to.clone()))
        .subject(message.subject.as_str());

    if let Some(reply_to) = &message.reply_to {
        builder = builder.reply_to(reply_to.clone());
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            message.text_body.clone(),
            message.html_body.clone(),
        ))
        .map_err(|e| EmailError::InvalidMessage(e.to_string()))
}

fn smtp_status_code(e: &lettre::transport::smtp::Error) -> Option<u16> {
    e.status().and_then(|code| code.to_string().parse().ok())
}
