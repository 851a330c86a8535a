pub mod candidates;
pub mod delivery;
pub mod senders;
pub mod templates;

use async_trait::async_trait;
use lettre::message::{Mailbox, Mailboxes};
use std::fmt;
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub use candidates::TransportCandidate;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailError {
    RelayConnectionFailed(String),
    VerificationFailed(String, Option<u16>),
    InvalidMessage(String),
    FailedToSend(String, Option<u16>),
}

impl EmailError {
    /// Short machine-readable tag for diagnostics output.
    pub fn code(&self) -> &'static str {
        match self {
            EmailError::RelayConnectionFailed(_) => "CONNECTION",
            EmailError::VerificationFailed(_, _) => "VERIFY",
            EmailError::InvalidMessage(_) => "MESSAGE",
            EmailError::FailedToSend(_, _) => "SEND",
        }
    }

    /// The SMTP reply code the relay answered with, if it got that far.
    pub fn response_code(&self) -> Option<u16> {
        match self {
            EmailError::VerificationFailed(_, code) | EmailError::FailedToSend(_, code) => *code,
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            EmailError::RelayConnectionFailed(m)
            | EmailError::VerificationFailed(m, _)
            | EmailError::InvalidMessage(m)
            | EmailError::FailedToSend(m, _) => m,
        }
    }
}

impl std::error::Error for EmailError {}

impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailError::RelayConnectionFailed(e) => {
                write!(f, "EmailError: Relay connection failed: {e}")
            }
            EmailError::VerificationFailed(e, Some(code)) => {
                write!(f, "EmailError: Relay verification failed ({code}): {e}")
            }
            EmailError::VerificationFailed(e, None) => {
                write!(f, "EmailError: Relay verification failed: {e}")
            }
            EmailError::InvalidMessage(e) => write!(f, "EmailError: Invalid message: {e}"),
            EmailError::FailedToSend(e, Some(code)) => {
                write!(f, "EmailError: Failed to send ({code}): {e}")
            }
            EmailError::FailedToSend(e, None) => write!(f, "EmailError: Failed to send: {e}"),
        }
    }
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl SmtpCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: String::from(username),
            password: String::from(password),
        }
    }
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub from: Mailbox,
    pub to: Mailboxes,
    pub reply_to: Option<Mailbox>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl EmailMessage {
    pub fn recipient_addresses(&self) -> Vec<String> {
        self.to.iter().map(|m| m.email.to_string()).collect()
    }
}

/// One SMTP session bound to a single transport candidate.
#[async_trait]
pub trait SmtpSession: Send + Sync {
    /// Connects and authenticates without transferring a message.
    async fn verify(&self) -> Result<(), EmailError>;
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}

pub trait SmtpConnector: Send + Sync {
    fn connect(
        &self,
        candidate: &TransportCandidate,
        credentials: &SmtpCredentials,
    ) -> Result<Box<dyn SmtpSession>, EmailError>;
}

pub type Connector = Arc<dyn SmtpConnector>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_diagnostics() {
        let err = EmailError::VerificationFailed(String::from("bad auth"), Some(535));
        assert_eq!(err.code(), "VERIFY");
        assert_eq!(err.response_code(), Some(535));
        assert_eq!(err.message(), "bad auth");
        assert_eq!(
            err.to_string(),
            "EmailError: Relay verification failed (535): bad auth"
        );

        let err = EmailError::RelayConnectionFailed(String::from("refused"));
        assert_eq!(err.code(), "CONNECTION");
        assert_eq!(err.response_code(), None);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = SmtpCredentials::new("mailer@example.com", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("mailer@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
