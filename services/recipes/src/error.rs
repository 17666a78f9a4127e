//! Error types for account management and field validation

use rust_decimal::Decimal;
use thiserror::Error;

use crate::password::PasswordError;
use crate::repositories::RepositoryError;

/// Validation errors raised before anything reaches the repository
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `create_user` was called without an email address
    #[error("User must have an email address.")]
    MissingEmail,

    /// Price does not fit five digits with two decimal places
    #[error("Price {value} does not fit in 5 digits with 2 decimal places")]
    PriceOutOfRange { value: Decimal },
}

/// Errors returned by the user manager
#[derive(Error, Debug)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Constraint or connectivity failure reported by the repository
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Type alias for account manager results
pub type AccountResult<T> = Result<T, AccountError>;
