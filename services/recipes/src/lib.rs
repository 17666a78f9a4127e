//! Recipe management data layer
//!
//! User accounts, recipes, tags and ingredients persisted through the
//! repository traits in [`repositories`], with PostgreSQL and in-memory
//! implementations.

pub mod accounts;
pub mod error;
pub mod models;
pub mod normalize;
pub mod password;
pub mod repositories;
pub mod settings;
pub mod uploads;

use sqlx::migrate::Migrator;

pub use accounts::UserManager;
pub use error::{AccountError, AccountResult, ValidationError};
pub use repositories::{InMemoryRepository, PgRepository, RepositoryError, RepositoryResult};

/// Schema migrations for the PostgreSQL repository
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
