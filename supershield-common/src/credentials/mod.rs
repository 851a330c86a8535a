use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

// Browsers pad, but hand-written clients often don't
const B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A username/password pair taken from an `Authorization: Basic ...` header.
#[derive(Debug, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Returns `None` when the header doesn't use the Basic scheme. A Basic header whose
    /// payload doesn't decode yields empty credentials, which will never match.
    pub fn from_header(header: &str) -> Option<Self> {
        let encoded = header.strip_prefix("Basic ")?;
        let encoded = encoded.split(' ').next().unwrap_or("");

        let decoded = B64
            .decode(encoded.trim())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();

        let (username, password) = decoded.split_once(':').unwrap_or((decoded.as_str(), ""));

        Some(Self {
            username: String::from(username),
            password: String::from(password),
        })
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        // Evaluate both so a wrong username takes as long as a wrong password
        let username_matches = are_equal(&self.username, username);
        let password_matches = are_equal(&self.password, password);

        username_matches & password_matches
    }
}

pub fn are_equal(given: &str, expected: &str) -> bool {
    let given = given.as_bytes();
    let expected = expected.as_bytes();

    if given.len() != expected.len() {
        return false;
    }

    let mut bytes_dont_match = 0u8;

    // Do bitwise comparison to prevent timing attacks
    for (given_byte, expected_byte) in given.iter().zip(expected.iter()) {
        bytes_dont_match |= given_byte ^ expected_byte;
    }

    bytes_dont_match == 0
}
