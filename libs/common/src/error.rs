//! Custom error types for the common library
//!
//! This module defines the database error type shared by every service
//! that talks to PostgreSQL.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Failures of the shared PostgreSQL plumbing
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The recipes pool could not open a connection to PostgreSQL
    #[error("Could not connect to the recipes database: {0}")]
    Connection(#[source] SqlxError),

    /// A statement issued by a repository failed and the failure has no
    /// dedicated repository variant
    #[error("Recipes database query failed: {0}")]
    Query(#[source] SqlxError),

    /// Applying the recipes schema migrations failed
    #[error("Recipes schema migration failed: {0}")]
    Migration(String),

    /// `DATABASE_URL` or `DATABASE_MAX_CONNECTIONS` holds an unusable value
    #[error("Invalid recipes database configuration: {0}")]
    Configuration(String),
}

/// Result of the shared database helpers
pub type DatabaseResult<T> = Result<T, DatabaseError>;
