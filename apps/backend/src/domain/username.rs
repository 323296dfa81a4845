//! Username format rules for the identity registry.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

pub const USERNAME_MIN_LEN: usize = 6;
pub const USERNAME_MAX_LEN: usize = 20;

fn username_regex() -> &'static Regex {
    static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[a-z0-9_]{6,20}$").unwrap()
    });
    &USERNAME_REGEX
}

/// A registry-approved username: 6-20 characters of `[a-z0-9_]`.
///
/// Construction goes through [`Username::parse`], which trims and lowercases
/// its input before checking the format, so `" Alice_01 "` becomes
/// `"alice_01"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        if !username_regex().is_match(&normalized) {
            return Err(DomainError::validation(
                ValidationKind::InvalidUsername,
                format!(
                    "Username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters long and contain only lowercase letters, numbers, and underscores (got {} characters)",
                    normalized.chars().count()
                ),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Username::parse(&value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}
