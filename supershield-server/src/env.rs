use lettre::message::{Mailbox, Mailboxes};
use lettre::Address;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use supershield_common::email::candidates::{build_candidates, parse_port};
use supershield_common::email::{SmtpCredentials, TransportCandidate};
use zeroize::{Zeroize, ZeroizeOnDrop};

const TO_EMAIL_VAR: &str = "TO_EMAIL";
const SMTP_HOST_VAR: &str = "SMTP_HOST";
const SMTP_PORT_VAR: &str = "SMTP_PORT";
const SMTP_USER_VAR: &str = "SMTP_USER";
const SMTP_PASS_VAR: &str = "SMTP_PASS";
const SMTP_TIMEOUT_SECS_VAR: &str = "SMTP_TIMEOUT_SECS";

const FROM_NAME_VAR: &str = "FROM_NAME";
const REPLY_TO_VAR: &str = "REPLY_TO";

const ADMIN_USER_VAR: &str = "ADMIN_USER";
const ADMIN_PASS_VAR: &str = "ADMIN_PASS";
const ADMIN_REDIRECT_PATH_VAR: &str = "ADMIN_REDIRECT_PATH";

const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
const ACTIX_WORKER_COUNT_VAR: &str = "ACTIX_WORKER_COUNT";

/// Keys that must all be set before any mail can go out.
pub const REQUIRED_MAIL_VARS: [&str; 5] = [
    TO_EMAIL_VAR,
    SMTP_HOST_VAR,
    SMTP_PORT_VAR,
    SMTP_USER_VAR,
    SMTP_PASS_VAR,
];

pub const DEFAULT_FROM_NAME: &str = "Supershield Website";
pub const DEFAULT_ADMIN_USER: &str = "supershield";
pub const DEFAULT_ADMIN_PASS: &str = "ChangeMeNow";
pub const DEFAULT_ADMIN_REDIRECT_PATH: &str = "/admin-plain.html";

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Config {
    #[zeroize(skip)]
    pub to_email: Option<String>,
    #[zeroize(skip)]
    pub smtp_host: Option<String>,
    #[zeroize(skip)]
    pub smtp_port: Option<String>,
    #[zeroize(skip)]
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    #[zeroize(skip)]
    pub smtp_timeout: Duration,

    #[zeroize(skip)]
    pub from_name: String,
    #[zeroize(skip)]
    pub reply_to: Option<String>,

    pub admin_user: String,
    pub admin_pass: String,
    #[zeroize(skip)]
    pub admin_uses_default_credentials: bool,
    #[zeroize(skip)]
    pub admin_redirect_path: String,

    #[zeroize(skip)]
    pub log_level: String,
    #[zeroize(skip)]
    pub actix_worker_count: usize,
}

/// Which required mail keys are set, in `REQUIRED_MAIL_VARS` order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub present: Vec<&'static str>,
    pub missing: Vec<&'static str>,
}

impl ConfigSnapshot {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Everything needed to send the enquiry emails, resolved and validated.
pub struct MailSettings {
    pub admin: Mailboxes,
    pub sender: Address,
    pub from_name: String,
    pub reply_to: Option<Mailbox>,
    pub credentials: SmtpCredentials,
    pub candidates: Vec<TransportCandidate>,
}

impl Config {
    pub fn from_env() -> Config {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let admin_user = lookup(ADMIN_USER_VAR);
        let admin_pass = lookup(ADMIN_PASS_VAR);
        let admin_uses_default_credentials = admin_user.is_none() || admin_pass.is_none();

        Config {
            to_email: lookup(TO_EMAIL_VAR),
            smtp_host: lookup(SMTP_HOST_VAR),
            smtp_port: lookup(SMTP_PORT_VAR),
            smtp_user: lookup(SMTP_USER_VAR),
            smtp_pass: lookup(SMTP_PASS_VAR),
            smtp_timeout: Duration::from_secs(var_or(&lookup, SMTP_TIMEOUT_SECS_VAR, 30)),

            from_name: lookup(FROM_NAME_VAR).unwrap_or_else(|| String::from(DEFAULT_FROM_NAME)),
            reply_to: lookup(REPLY_TO_VAR),

            admin_user: admin_user.unwrap_or_else(|| String::from(DEFAULT_ADMIN_USER)),
            admin_pass: admin_pass.unwrap_or_else(|| String::from(DEFAULT_ADMIN_PASS)),
            admin_uses_default_credentials,
            admin_redirect_path: lookup(ADMIN_REDIRECT_PATH_VAR)
                .unwrap_or_else(|| String::from(DEFAULT_ADMIN_REDIRECT_PATH)),

            log_level: lookup(LOG_LEVEL_VAR).unwrap_or_else(|| String::from("info")),
            actix_worker_count: var_or(&lookup, ACTIX_WORKER_COUNT_VAR, num_cpus::get()),
        }
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        let mut present = Vec::with_capacity(REQUIRED_MAIL_VARS.len());
        let mut missing = Vec::new();

        for key in REQUIRED_MAIL_VARS {
            if self.required_value(key).is_some() {
                present.push(key);
            } else {
                missing.push(key);
            }
        }

        ConfigSnapshot { present, missing }
    }

    /// Primary and fallback transports for the configured relay. Empty when no host is set.
    pub fn smtp_candidates(&self) -> Vec<TransportCandidate> {
        match &self.smtp_host {
            Some(host) => build_candidates(host, parse_port(self.smtp_port.as_deref())),
            None => Vec::new(),
        }
    }

    pub fn smtp_credentials(&self) -> SmtpCredentials {
        SmtpCredentials::new(
            self.smtp_user.as_deref().unwrap_or_default(),
            self.smtp_pass.as_deref().unwrap_or_default(),
        )
    }

    pub fn mail_settings(&self) -> Result<MailSettings, ConfigError> {
        for key in REQUIRED_MAIL_VARS {
            if self.required_value(key).is_none() {
                return Err(ConfigError::missing(key));
            }
        }

        let admin = parse_var::<Mailboxes>(TO_EMAIL_VAR, self.to_email.as_deref())?;
        let sender = parse_var::<Address>(SMTP_USER_VAR, self.smtp_user.as_deref())?;
        let reply_to = match self.reply_to.as_deref() {
            Some(r) => Some(parse_var::<Mailbox>(REPLY_TO_VAR, Some(r))?),
            None => None,
        };

        Ok(MailSettings {
            admin,
            sender,
            from_name: self.from_name.clone(),
            reply_to,
            credentials: self.smtp_credentials(),
            candidates: self.smtp_candidates(),
        })
    }

    fn required_value(&self, key: &str) -> Option<&str> {
        match key {
            TO_EMAIL_VAR => self.to_email.as_deref(),
            SMTP_HOST_VAR => self.smtp_host.as_deref(),
            SMTP_PORT_VAR => self.smtp_port.as_deref(),
            SMTP_USER_VAR => self.smtp_user.as_deref(),
            SMTP_PASS_VAR => self.smtp_pass.as_deref(),
            _ => None,
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, value: Option<&str>) -> Result<T, ConfigError> {
    let value = value.ok_or(ConfigError::missing(key))?;
    value.trim().parse().map_err(|_| ConfigError::invalid(key))
}

fn var_or<T: FromStr, F>(lookup: &F, key: &'static str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
{
    let Some(var) = lookup(key) else {
        return default;
    };

    var.parse().unwrap_or(default)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidVar(&'static str),
}

impl ConfigError {
    fn missing(var_name: &'static str) -> Self {
        Self::MissingVar(var_name)
    }

    fn invalid(var_name: &'static str) -> Self {
        Self::InvalidVar(var_name)
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar(key) => write!(f, "Missing environment variable '{}'", key),
            Self::InvalidVar(key) => write!(f, "Environment variable '{}' is invalid", key),
        }
    }
}
