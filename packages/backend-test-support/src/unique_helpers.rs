//! Test helpers for generating unique test data
//!
//! Values are derived from ULIDs so parallel tests sharing one store never
//! collide on usernames, emails or account ids.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("acct");
/// let id2 = unique_str("acct");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("acct-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("test");
/// assert!(email.ends_with("@example.test"));
/// assert!(email.starts_with("test-"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}

/// Generate a unique username that satisfies the registry format
/// (6-20 characters of `[a-z0-9_]`).
///
/// The prefix is truncated to 7 characters and joined with the 12 most
/// random characters of a ULID, so the result is always 20 characters or
/// fewer.
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_username;
///
/// let name = unique_username("alice");
/// assert!(name.starts_with("alice_"));
/// assert!(name.len() >= 6 && name.len() <= 20);
/// ```
pub fn unique_username(prefix: &str) -> String {
    let prefix: String = prefix
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(7)
        .collect();
    let ulid = Ulid::new().to_string().to_lowercase();
    let tail = &ulid[ulid.len() - 12..];
    format!("{prefix}_{tail}")
}
