//! Account records held by the identity registry.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use unicode_normalization::UnicodeNormalization;

use crate::domain::ids::AccountId;
use crate::domain::username::Username;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: AccountId,
    pub display_name: String,
    pub email: String,
    /// Claimed at most once; `None` until the owner reserves a username.
    pub username: Option<Username>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Account {
    pub fn new(
        account_id: AccountId,
        display_name: &str,
        email: &str,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            account_id,
            display_name: display_name.trim().to_string(),
            email: normalize_email(email),
            username: None,
            created_at,
        }
    }
}

/// Trim, NFKC-normalise and lowercase an email for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}
