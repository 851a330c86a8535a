use serde::Serialize;

pub const IMPLICIT_TLS_PORT: u16 = 465;
pub const STARTTLS_PORT: u16 = 587;

/// A host/port/security combination offered to an SMTP session. `secure` means TLS from
/// the first byte; otherwise the session connects in plaintext and upgrades with STARTTLS
/// when the relay offers it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransportCandidate {
    pub host: String,
    pub port: u16,
    pub secure: bool,
}

impl TransportCandidate {
    pub fn new(host: &str, port: u16, secure: bool) -> Self {
        Self {
            host: String::from(host),
            port,
            secure,
        }
    }
}

/// Parses a configured port. Blank or unparsable values count as unspecified.
pub fn parse_port(port: Option<&str>) -> Option<u16> {
    port.map(str::trim)
        .filter(|p| !p.is_empty())
        .and_then(|p| p.parse::<u16>().ok())
        .filter(|p| *p != 0)
}

/// Builds the ordered primary + fallback candidates for a relay host.
pub fn build_candidates(host: &str, port: Option<u16>) -> Vec<TransportCandidate> {
    match port {
        None | Some(IMPLICIT_TLS_PORT) => vec![
            TransportCandidate::new(host, IMPLICIT_TLS_PORT, true),
            TransportCandidate::new(host, STARTTLS_PORT, false),
        ],
        Some(port) => vec![
            TransportCandidate::new(host, port, port == IMPLICIT_TLS_PORT),
            TransportCandidate::new(host, IMPLICIT_TLS_PORT, true),
        ],
    }
}
