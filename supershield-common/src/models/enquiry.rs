use lettre::Address;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A contact form submission as posted by the website. Missing or non-text values
/// deserialize to `None`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSubmission {
    #[serde(deserialize_with = "text_or_number")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub email: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub message: Option<String>,
}

/// A submission whose required fields are present and whose email address parses.
#[derive(Clone, Debug)]
pub struct Enquiry {
    pub first_name: String,
    pub last_name: String,
    pub email: Address,
    pub phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionError {
    MissingFields,
    InvalidEmail,
}

impl std::error::Error for SubmissionError {}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::MissingFields => write!(f, "Missing firstName/lastName/email"),
            SubmissionError::InvalidEmail => write!(f, "Invalid email address"),
        }
    }
}

impl FormSubmission {
    /// Parses a raw request body. Anything that isn't a JSON object is treated as an empty
    /// submission so that it fails validation rather than deserialization.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn validate(self) -> Result<Enquiry, SubmissionError> {
        let (Some(first_name), Some(last_name), Some(email)) =
            (self.first_name, self.last_name, self.email)
        else {
            return Err(SubmissionError::MissingFields);
        };

        let email = email
            .trim()
            .parse::<Address>()
            .map_err(|_| SubmissionError::InvalidEmail)?;

        Ok(Enquiry {
            first_name,
            last_name,
            email,
            phone: self.phone,
            message: self.message,
        })
    }
}

impl Enquiry {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Phone number, or `-` when none was given.
    pub fn phone_or_placeholder(&self) -> &str {
        self.phone.as_deref().unwrap_or("-")
    }

    /// Message text, or `-` when none was given.
    pub fn message_or_placeholder(&self) -> &str {
        self.message.as_deref().unwrap_or("-")
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        // A bare zero is treated like a blank field
        Some(serde_json::Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    })
}
