//! Backend test support utilities
//!
//! Shared helpers for the ledger backend test suites: one-time logging
//! initialization and generators for unique accounts, emails and usernames.

pub mod logging;
pub mod unique_helpers;
