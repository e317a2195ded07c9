//! Student identity validation.
//!
//! An [`EmailAddress`] can only be built through [`EmailAddress::parse`], so
//! the ledger never sees malformed identities.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

const MAX_EMAIL_LEN: usize = 254;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEmail {
    #[error("email address is empty")]
    Empty,

    #[error("email address is longer than 254 characters")]
    TooLong,

    #[error("'{0}' is not a valid email address")]
    Malformed(String),
}

/// A syntactically valid student email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalize an email address.
    ///
    /// Surrounding whitespace is trimmed and the domain part is lowercased;
    /// the local part is kept as typed.
    pub fn parse(raw: &str) -> Result<Self, InvalidEmail> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidEmail::Empty);
        }
        if trimmed.len() > MAX_EMAIL_LEN {
            return Err(InvalidEmail::TooLong);
        }

        let regex = EMAIL_REGEX.get_or_init(|| {
            // Local part: RFC 5322 atext plus dots.
            Regex::new(
                r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$",
            )
            .expect("Invalid email regex")
        });
        if !regex.is_match(trimmed) {
            return Err(InvalidEmail::Malformed(trimmed.to_string()));
        }

        let (local, domain) = trimmed
            .split_once('@')
            .ok_or_else(|| InvalidEmail::Malformed(trimmed.to_string()))?;
        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return Err(InvalidEmail::Malformed(trimmed.to_string()));
        }

        Ok(Self(format!("{}@{}", local, domain.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map(|(_, d)| d).unwrap_or_default()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = InvalidEmail;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
