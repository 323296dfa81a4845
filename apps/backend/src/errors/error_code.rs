//! Error codes for the ledger backend.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and are the stable identifiers
//! callers match on.

use core::fmt;

/// Centralized error codes for the ledger backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Username is not 6-20 characters of [a-z0-9_]
    InvalidUsername,
    /// Session name empty or longer than 40 characters
    InvalidSessionName,
    /// Currency outside the supported set
    InvalidCurrency,
    /// Host username missing
    InvalidHost,
    /// Session created without players
    NoPlayers,
    /// Negative, zero (for buy-ins) or non-finite amount
    InvalidAmount,
    /// Settlement attempted before every final stack is recorded
    MissingFinalStack,
    /// Unrecognised mirror field path
    InvalidFieldPath,
    /// Settlement requested for an empty player list
    NoOpPlan,
    /// General validation error
    ValidationError,

    // Resource Not Found
    /// Account not found
    AccountNotFound,
    /// Username not registered
    UsernameNotFound,
    /// Game session not found
    SessionNotFound,
    /// Player not part of the session
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Uniqueness Conflicts
    /// Username already claimed by another account
    UsernameTaken,
    /// Account already owns a username
    AlreadyHasUsername,
    /// Player already in the session
    DuplicatePlayer,
    /// Ledger changed while a settlement was in progress
    LedgerChanged,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // Session State
    /// Session is no longer active
    SessionNotActive,
    /// Session has already been completed
    SessionAlreadyComplete,
    /// Generic state error
    StateError,

    // Settlement
    /// Net positions do not sum to zero
    ZeroSumViolation,

    // System Errors
    /// Settlement advisor failure
    AdvisorError,
    /// Data corruption detected
    DataCorruption,
    /// Configuration error
    ConfigError,
    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Request Validation
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidSessionName => "INVALID_SESSION_NAME",
            Self::InvalidCurrency => "INVALID_CURRENCY",
            Self::InvalidHost => "INVALID_HOST",
            Self::NoPlayers => "NO_PLAYERS",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::MissingFinalStack => "MISSING_FINAL_STACK",
            Self::InvalidFieldPath => "INVALID_FIELD_PATH",
            Self::NoOpPlan => "NO_OP_PLAN",
            Self::ValidationError => "VALIDATION_ERROR",

            // Resource Not Found
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::UsernameNotFound => "USERNAME_NOT_FOUND",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Uniqueness Conflicts
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::AlreadyHasUsername => "ALREADY_HAS_USERNAME",
            Self::DuplicatePlayer => "DUPLICATE_PLAYER",
            Self::LedgerChanged => "LEDGER_CHANGED",
            Self::Conflict => "CONFLICT",

            // Session State
            Self::SessionNotActive => "SESSION_NOT_ACTIVE",
            Self::SessionAlreadyComplete => "SESSION_ALREADY_COMPLETE",
            Self::StateError => "STATE_ERROR",

            // Settlement
            Self::ZeroSumViolation => "ZERO_SUM_VIOLATION",

            // System Errors
            Self::AdvisorError => "ADVISOR_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
