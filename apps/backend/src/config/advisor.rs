use std::env;
use std::time::Duration;

use crate::error::AppError;

pub const ADVISOR_URL_VAR: &str = "SETTLE_ADVISOR_URL";
pub const ADVISOR_API_KEY_VAR: &str = "SETTLE_ADVISOR_API_KEY";
pub const ADVISOR_TIMEOUT_VAR: &str = "SETTLE_ADVISOR_TIMEOUT_SECS";

pub const DEFAULT_ADVISOR_TIMEOUT_SECS: u64 = 20;

/// Connection settings for the remote settlement advisor.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl AdvisorConfig {
    /// Reads the advisor settings from the environment.
    ///
    /// Returns `Ok(None)` when no advisor URL is configured; settlements then
    /// use the engine's plan only.
    pub fn from_env() -> Result<Option<Self>, AppError> {
        let Some(url) = optional_var(ADVISOR_URL_VAR)? else {
            return Ok(None);
        };
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::config(format!(
                "{ADVISOR_URL_VAR} must be an http(s) URL, got '{url}'"
            )));
        }

        let timeout_secs = match optional_var(ADVISOR_TIMEOUT_VAR)? {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    AppError::config(format!(
                        "{ADVISOR_TIMEOUT_VAR} must be a positive number of seconds, got '{raw}'"
                    ))
                })?,
            None => DEFAULT_ADVISOR_TIMEOUT_SECS,
        };

        Ok(Some(Self {
            url,
            api_key: optional_var(ADVISOR_API_KEY_VAR)?,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

/// Trimmed value of `name`; unset or blank reads as `None`.
fn optional_var(name: &str) -> Result<Option<String>, AppError> {
    match env::var(name) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(v.trim().to_string())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
