//! Domain-level error type used across services, repos and the writer.
//!
//! This error type is HTTP- and DB-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! through `From<DomainError> for AppError`.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    DataCorruption,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    User,
    Template,
    Game,
    Invite,
    Membership,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    UniqueEmail,
    UniqueName,
    InviteNotPending,
    GameAlreadyFinished,
    AlreadyInvited,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation or business rule violation
    Validation(String),
    /// A child row filed under the wrong parent; always aborts the write
    Integrity(String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Caller is authenticated but may not touch the resource
    Forbidden(String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(d) => write!(f, "validation error: {d}"),
            DomainError::Integrity(d) => write!(f, "integrity error: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Forbidden(d) => write!(f, "forbidden: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn integrity(detail: impl Into<String>) -> Self {
        Self::Integrity(detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden(detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// Prefix the detail with `context`, keeping the kind.
    ///
    /// The writer uses this to name the failing batched operation,
    /// e.g. `failed to insert question 3: ...`.
    pub fn with_context(self, context: impl Display) -> Self {
        let prefix = |d: String| format!("{context}: {d}");
        match self {
            DomainError::Validation(d) => DomainError::Validation(prefix(d)),
            DomainError::Integrity(d) => DomainError::Integrity(prefix(d)),
            DomainError::Conflict(k, d) => DomainError::Conflict(k, prefix(d)),
            DomainError::NotFound(k, d) => DomainError::NotFound(k, prefix(d)),
            DomainError::Forbidden(d) => DomainError::Forbidden(prefix(d)),
            DomainError::Infra(k, d) => DomainError::Infra(k, prefix(d)),
        }
    }

    /// Detail text without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(d)
            | DomainError::Integrity(d)
            | DomainError::Conflict(_, d)
            | DomainError::NotFound(_, d)
            | DomainError::Forbidden(d)
            | DomainError::Infra(_, d) => d,
        }
    }
}
