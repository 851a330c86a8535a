use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::email::{
    EmailError, EmailMessage, SmtpConnector, SmtpCredentials, SmtpSession, TransportCandidate,
};

#[derive(Clone, Debug)]
pub enum MockEvent {
    Connect(TransportCandidate),
    Verify(TransportCandidate),
    Send(TransportCandidate, EmailMessage),
}

#[derive(Default)]
struct MockState {
    connect_failures: HashMap<u16, EmailError>,
    verify_failures: HashMap<u16, EmailError>,
    send_failures: HashMap<u16, EmailError>,
    rejected_recipients: Vec<String>,
    events: Vec<MockEvent>,
}

/// Connector that never touches the network. Failures are scripted per candidate port
/// (or per recipient address) and every call is recorded for later inspection.
#[derive(Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_connect_on(self, port: u16, error: EmailError) -> Self {
        self.lock().connect_failures.insert(port, error);
        self
    }

    pub fn fail_verify_on(self, port: u16, error: EmailError) -> Self {
        self.lock().verify_failures.insert(port, error);
        self
    }

    pub fn fail_send_on(self, port: u16, error: EmailError) -> Self {
        self.lock().send_failures.insert(port, error);
        self
    }

    pub fn reject_recipient(self, address: &str) -> Self {
        self.lock().rejected_recipients.push(String::from(address));
        self
    }

    pub fn events(&self) -> Vec<MockEvent> {
        self.lock().events.clone()
    }

    pub fn connections(&self) -> Vec<TransportCandidate> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                MockEvent::Connect(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn verifications(&self) -> Vec<TransportCandidate> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                MockEvent::Verify(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                MockEvent::Send(_, m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("Mock connector state was poisoned")
    }
}

impl SmtpConnector for MockConnector {
    fn connect(
        &self,
        candidate: &TransportCandidate,
        _credentials: &SmtpCredentials,
    ) -> Result<Box<dyn SmtpSession>, EmailError> {
        let mut state = self.lock();
        state.events.push(MockEvent::Connect(candidate.clone()));

        if let Some(e) = state.connect_failures.get(&candidate.port) {
            return Err(e.clone());
        }

        Ok(Box::new(MockSession {
            candidate: candidate.clone(),
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockSession {
    candidate: TransportCandidate,
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl SmtpSession for MockSession {
    async fn verify(&self) -> Result<(), EmailError> {
        let mut state = self.state.lock().expect("Mock connector state was poisoned");
        state.events.push(MockEvent::Verify(self.candidate.clone()));

        match state.verify_failures.get(&self.candidate.port) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let mut state = self.state.lock().expect("Mock connector state was poisoned");

        if let Some(e) = state.send_failures.get(&self.candidate.port) {
            return Err(e.clone());
        }

        let rejected = message
            .recipient_addresses()
            .into_iter()
            .find(|r| state.rejected_recipients.contains(r));
        if let Some(recipient) = rejected {
            return Err(EmailError::FailedToSend(
                format!("Recipient {recipient} rejected"),
                Some(550),
            ));
        }

        log::debug!("Mock send via {}:{}: {:?}", self.candidate.host, self.candidate.port, message);
        state
            .events
            .push(MockEvent::Send(self.candidate.clone(), message.clone()));

        Ok(())
    }
}
