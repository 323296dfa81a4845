//! Errors raised by the pure domain layer.
//!
//! Nothing here knows about storage or callers; services turn a
//! `DomainError` into an [`crate::error::AppError`] with `?`.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Validation failure kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    InvalidUsername,
    InvalidSessionName,
    InvalidCurrency,
    InvalidHost,
    NoPlayers,
    InvalidAmount,
    MissingFinalStack,
    InvalidFieldPath,
    NoOpPlan,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Account,
    Username,
    Session,
    Player,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    UsernameTaken,
    AlreadyHasUsername,
    DuplicatePlayer,
    /// Ledger moved after a settlement plan was computed from it
    LedgerChanged,
    Other(String),
}

/// Operations attempted in the wrong session status
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateKind {
    SessionNotActive,
    SessionAlreadyComplete,
    Other(String),
}

/// Store-level failures that are not the caller's fault
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    /// Two records that must agree do not
    DataCorruption,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Uniqueness conflict
    Conflict(ConflictKind, String),
    /// Operation invalid for the current session status
    State(StateKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Net positions do not sum to zero; carries the signed imbalance
    ZeroSumViolation(f64),
    /// Broken store invariants
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::State(kind, d) => write!(f, "state error {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::ZeroSumViolation(discrepancy) => {
                write!(f, "net positions do not sum to zero (off by {discrepancy:.2})")
            }
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn state(kind: StateKind, detail: impl Into<String>) -> Self {
        Self::State(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}
