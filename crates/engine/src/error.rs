//! The module contains the errors the engine can throw.
//!
//! Each variant is a domain-level kind, not a transport code. Callers map
//! them to their own outcomes:
//!
//! - [`Validation`] malformed input (bad email, non-positive amount, month or
//!   year out of range, empty names, forbidden role in a payload).
//! - [`Unauthorized`] the actor lacks the required capability or membership.
//! - [`WorkspaceNotFound`], [`MemberNotFound`] and [`NotFound`] for missing
//!   workspaces, memberships and everything else (budgets, categories, users).
//! - [`Conflict`] duplicate names, duplicate budget periods and referential
//!   integrity violations on delete.
//! - [`Database`] anything the storage layer raised that is not one of the
//!   above.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Unauthorized`]: EngineError::Unauthorized
//!  [`WorkspaceNotFound`]: EngineError::WorkspaceNotFound
//!  [`MemberNotFound`]: EngineError::MemberNotFound
//!  [`NotFound`]: EngineError::NotFound
//!  [`Conflict`]: EngineError::Conflict
//!  [`Database`]: EngineError::Database
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),
    #[error("Member not found: {0}")]
    MemberNotFound(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Translates a failed insert or update into a domain error.
    ///
    /// A unique violation becomes [`EngineError::Conflict`] with the given
    /// message. A foreign-key violation means the row points at something
    /// that does not exist, reported as [`EngineError::NotFound`] of
    /// `missing`. Every other storage failure stays a database error.
    pub(crate) fn from_write(
        err: DbErr,
        missing: &str,
        conflict: impl FnOnce() -> String,
    ) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict(conflict()),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::NotFound(missing.to_string()),
            _ => Self::Database(err),
        }
    }

    /// Translates a failed delete. Rows still referencing the target become
    /// [`EngineError::Conflict`].
    pub(crate) fn from_delete(err: DbErr, conflict: impl FnOnce() -> String) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::Conflict(conflict()),
            _ => Self::Database(err),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::WorkspaceNotFound(a), Self::WorkspaceNotFound(b)) => a == b,
            (Self::MemberNotFound(a), Self::MemberNotFound(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_integrity_errors_stay_database_errors() {
        let err = EngineError::from_write(DbErr::Custom("boom".to_string()), "user", || {
            "duplicate".to_string()
        });
        assert_eq!(err, EngineError::Database(DbErr::Custom("boom".to_string())));

        let err = EngineError::from_delete(DbErr::Custom("boom".to_string()), || {
            "referenced".to_string()
        });
        assert_eq!(err, EngineError::Database(DbErr::Custom("boom".to_string())));
    }
}
