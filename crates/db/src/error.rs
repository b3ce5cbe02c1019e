use irs_core::types::DbId;

/// Errors raised by store operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}
