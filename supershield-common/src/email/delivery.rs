use std::fmt;

use crate::email::{EmailError, EmailMessage, SmtpConnector, SmtpCredentials, TransportCandidate};

/// The candidate that carried a successful verify or send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub candidate: TransportCandidate,
    pub attempts: usize,
}

/// Every candidate failed. `last_error` is the error from the final candidate attempted.
#[derive(Clone, Debug)]
pub struct DeliveryError {
    pub tried: Vec<TransportCandidate>,
    pub last_error: EmailError,
}

impl std::error::Error for DeliveryError {}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DeliveryError: All {} transport candidate(s) failed, last error: {}",
            self.tried.len(),
            self.last_error,
        )
    }
}

enum Stage<'a> {
    VerifyOnly,
    Send(&'a EmailMessage),
}

pub async fn send_with_fallback(
    connector: &dyn SmtpConnector,
    candidates: &[TransportCandidate],
    credentials: &SmtpCredentials,
    message: &EmailMessage,
) -> Result<Delivery, DeliveryError> {
    run_candidates(connector, candidates, credentials, Stage::Send(message)).await
}

/// Walks the same candidates as `send_with_fallback` but stops after the verify step.
pub async fn verify_with_fallback(
    connector: &dyn SmtpConnector,
    candidates: &[TransportCandidate],
    credentials: &SmtpCredentials,
) -> Result<Delivery, DeliveryError> {
    run_candidates(connector, candidates, credentials, Stage::VerifyOnly).await
}

async fn run_candidates(
    connector: &dyn SmtpConnector,
    candidates: &[TransportCandidate],
    credentials: &SmtpCredentials,
    stage: Stage<'_>,
) -> Result<Delivery, DeliveryError> {
    let mut tried = Vec::with_capacity(candidates.len());
    let mut last_error =
        EmailError::RelayConnectionFailed(String::from("No transport candidates configured"));

    for candidate in candidates {
        tried.push(candidate.clone());

        match attempt(connector, candidate, credentials, &stage).await {
            Ok(()) => {
                log::info!(
                    "SMTP candidate {}:{} (secure={}) succeeded",
                    candidate.host,
                    candidate.port,
                    candidate.secure,
                );

                return Ok(Delivery {
                    candidate: candidate.clone(),
                    attempts: tried.len(),
                });
            }
            Err(e) => {
                log::warn!(
                    "SMTP candidate {}:{} (secure={}) failed: {e}",
                    candidate.host,
                    candidate.port,
                    candidate.secure,
                );
                last_error = e;
            }
        }
    }

    Err(DeliveryError { tried, last_error })
}

async fn attempt(
    connector: &dyn SmtpConnector,
    candidate: &TransportCandidate,
    credentials: &SmtpCredentials,
    stage: &Stage<'_>,
) -> Result<(), EmailError> {
    let session = connector.connect(candidate, credentials)?;
    session.verify().await?;

    match stage {
        Stage::VerifyOnly => Ok(()),
        Stage::Send(message) => session.send(message).await,
    }
}
