// Unit tests for error mapping - pure domain logic without storage dependencies
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, StateKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_kinds_to_codes() {
    let de = DomainError::validation(ValidationKind::InvalidUsername, "too short");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::InvalidUsername);
    assert!(matches!(app, AppError::Validation { .. }));

    let other = DomainError::validation(ValidationKind::Other("x".into()), "bad field");
    let app: AppError = other.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.detail(), "bad field");
}

#[test]
fn maps_conflicts() {
    let taken = DomainError::conflict(ConflictKind::UsernameTaken, "taken");
    let app: AppError = taken.into();
    assert_eq!(app.code().as_str(), "USERNAME_TAKEN");
    assert!(matches!(app, AppError::Conflict { .. }));

    let dup = DomainError::conflict(ConflictKind::DuplicatePlayer, "already seated");
    let app: AppError = dup.into();
    assert_eq!(app.code().as_str(), "DUPLICATE_PLAYER");

    let moved = DomainError::conflict(ConflictKind::LedgerChanged, "ledger moved");
    let app: AppError = moved.into();
    assert_eq!(app.code(), ErrorCode::LedgerChanged);

    // Generic conflict fallback
    let other = DomainError::conflict(ConflictKind::Other("misc".into()), "generic conflict");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
}

#[test]
fn maps_state_errors() {
    let de = DomainError::state(StateKind::SessionNotActive, "complete");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::SessionNotActive);
    assert!(matches!(app, AppError::State { .. }));
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::Account, "no account");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "ACCOUNT_NOT_FOUND");

    let nf = DomainError::not_found(NotFoundKind::Session, "no session");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "SESSION_NOT_FOUND");
}

#[test]
fn zero_sum_keeps_signed_discrepancy() {
    let app: AppError = DomainError::ZeroSumViolation(-4.5).into();
    assert_eq!(app.code(), ErrorCode::ZeroSumViolation);
    assert_eq!(app.discrepancy(), Some(-4.5));
    assert!(app.detail().contains("-4.50"));
}

#[test]
fn maps_infra() {
    let corrupt = DomainError::infra(InfraErrorKind::DataCorruption, "dangling claim");
    let app: AppError = corrupt.into();
    assert_eq!(app.code(), ErrorCode::DataCorruption);
    assert!(matches!(app, AppError::Internal { .. }));
    assert_eq!(app.discrepancy(), None);

    let other = DomainError::infra(InfraErrorKind::Other("x".into()), "odd");
    let app: AppError = other.into();
    assert_eq!(app.code(), ErrorCode::Internal);
}
