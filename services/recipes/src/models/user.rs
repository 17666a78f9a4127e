//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use crate::password::{self, PasswordError};

/// User entity
///
/// The email is the identity key and is stored normalized. Two users are
/// equal when their primary keys are equal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Encoded argon2 hash, or an unusable marker
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check a raw password against the stored hash
    pub fn check_password(&self, raw_password: &str) -> bool {
        password::verify_password(raw_password, &self.password_hash)
    }

    /// Replace the stored hash; `None` marks the password as unusable
    pub fn set_password(&mut self, raw_password: Option<&str>) -> Result<(), PasswordError> {
        self.password_hash = password::make_password(raw_password)?;
        Ok(())
    }

    pub fn has_usable_password(&self) -> bool {
        password::is_password_usable(&self.password_hash)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// New user creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Optional fields applied verbatim by `UserManager::create_user`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserFields {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl NewUser {
    /// Build a payload with the column defaults, then apply `fields`
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        fields: UserFields,
    ) -> Self {
        Self {
            email: email.into(),
            name: fields.name.unwrap_or_default(),
            password_hash: password_hash.into(),
            is_active: fields.is_active.unwrap_or(true),
            is_staff: fields.is_staff.unwrap_or(false),
            is_superuser: fields.is_superuser.unwrap_or(false),
        }
    }
}
