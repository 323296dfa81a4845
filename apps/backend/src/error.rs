use thiserror::Error;

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, StateKind, ValidationKind,
};
use crate::domain::settlement::SettlementError;
use crate::errors::ErrorCode;

/// Error returned by every service-level operation.
///
/// Each variant carries a stable [`ErrorCode`] plus a human-readable detail.
/// The variants map one-to-one onto the error taxonomy callers branch on:
/// validation, conflict, state, not found, zero-sum violation.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("State error: {detail}")]
    State { code: ErrorCode, detail: String },
    #[error("Settlement does not balance: off by {discrepancy:.2}")]
    ZeroSumViolation { discrepancy: f64 },
    #[error("Advisor error: {detail}")]
    Advisor { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
}

impl AppError {
    /// Stable error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::State { code, .. } => *code,
            AppError::ZeroSumViolation { .. } => ErrorCode::ZeroSumViolation,
            AppError::Advisor { .. } => ErrorCode::AdvisorError,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { code, .. } => *code,
        }
    }

    /// Human-readable detail for this error
    pub fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::State { detail, .. } => detail.clone(),
            AppError::ZeroSumViolation { discrepancy } => {
                format!("Net positions are off by {discrepancy:.2}; correct the ledger and retry")
            }
            AppError::Advisor { detail } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
            AppError::Internal { detail, .. } => detail.clone(),
        }
    }

    /// Signed imbalance for a zero-sum violation, `None` for every other error.
    pub fn discrepancy(&self) -> Option<f64> {
        match self {
            AppError::ZeroSumViolation { discrepancy } => Some(*discrepancy),
            _ => None,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn state(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::State {
            code,
            detail: detail.into(),
        }
    }

    pub fn zero_sum(discrepancy: f64) -> Self {
        Self::ZeroSumViolation { discrepancy }
    }

    pub fn advisor(detail: impl Into<String>) -> Self {
        Self::Advisor {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::Internal,
            detail: detail.into(),
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::InvalidUsername => ErrorCode::InvalidUsername,
                    ValidationKind::InvalidSessionName => ErrorCode::InvalidSessionName,
                    ValidationKind::InvalidCurrency => ErrorCode::InvalidCurrency,
                    ValidationKind::InvalidHost => ErrorCode::InvalidHost,
                    ValidationKind::NoPlayers => ErrorCode::NoPlayers,
                    ValidationKind::InvalidAmount => ErrorCode::InvalidAmount,
                    ValidationKind::MissingFinalStack => ErrorCode::MissingFinalStack,
                    ValidationKind::InvalidFieldPath => ErrorCode::InvalidFieldPath,
                    ValidationKind::NoOpPlan => ErrorCode::NoOpPlan,
                    _ => ErrorCode::ValidationError,
                };
                AppError::invalid(code, detail)
            }
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::UsernameTaken => ErrorCode::UsernameTaken,
                    ConflictKind::AlreadyHasUsername => ErrorCode::AlreadyHasUsername,
                    ConflictKind::DuplicatePlayer => ErrorCode::DuplicatePlayer,
                    ConflictKind::LedgerChanged => ErrorCode::LedgerChanged,
                    _ => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
            DomainError::State(kind, detail) => {
                let code = match kind {
                    StateKind::SessionNotActive => ErrorCode::SessionNotActive,
                    StateKind::SessionAlreadyComplete => ErrorCode::SessionAlreadyComplete,
                    _ => ErrorCode::StateError,
                };
                AppError::state(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Account => ErrorCode::AccountNotFound,
                    NotFoundKind::Username => ErrorCode::UsernameNotFound,
                    NotFoundKind::Session => ErrorCode::SessionNotFound,
                    NotFoundKind::Player => ErrorCode::PlayerNotFound,
                    _ => ErrorCode::NotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::ZeroSumViolation(discrepancy) => AppError::zero_sum(discrepancy),
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::DataCorruption => AppError::Internal {
                    code: ErrorCode::DataCorruption,
                    detail,
                },
                _ => AppError::internal(detail),
            },
        }
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        DomainError::from(err).into()
    }
}
