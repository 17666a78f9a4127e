//! User account manager
//!
//! Creates users with a normalized email and a hashed password. Every
//! other field is applied as given; uniqueness and column limits are left
//! to the repository.

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AccountResult, ValidationError};
use crate::models::{NewUser, User, UserFields};
use crate::normalize::normalize_email;
use crate::password;
use crate::repositories::UserRepository;

/// Manager for users
#[derive(Clone)]
pub struct UserManager<R> {
    repository: R,
}

impl<R: UserRepository> UserManager<R> {
    /// Create a new user manager
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Create and return a new user
    ///
    /// An empty email is rejected before anything is written. A `None`
    /// password stores an unusable hash.
    pub async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        fields: UserFields,
    ) -> AccountResult<User> {
        if email.is_empty() {
            warn!("Rejected user creation without an email address");
            return Err(ValidationError::MissingEmail.into());
        }

        let email = normalize_email(email);
        info!("Creating new user: {}", email);

        let password_hash = password::make_password(password)?;
        let new_user = NewUser::new(email, password_hash, fields);
        let user = self.repository.insert_user(&new_user).await?;

        Ok(user)
    }

    /// Create and return a new superuser
    pub async fn create_superuser(&self, email: &str, password: &str) -> AccountResult<User> {
        let mut user = self
            .create_user(email, Some(password), UserFields::default())
            .await?;

        info!("Promoting user to superuser: {}", user.email);
        user.is_staff = true;
        user.is_superuser = true;
        let user = self.repository.update_user(&user).await?;

        Ok(user)
    }

    /// Create a superuser unless a user with `email` already exists
    ///
    /// Returns `None` when the existing account was left untouched.
    pub async fn ensure_superuser(
        &self,
        email: &str,
        password: &str,
    ) -> AccountResult<Option<User>> {
        if let Some(existing) = self.get_by_email(email).await? {
            info!("Superuser {} already exists", existing.email);
            return Ok(None);
        }

        self.create_superuser(email, password).await.map(Some)
    }

    /// Look up a user by email, normalizing it first
    pub async fn get_by_email(&self, email: &str) -> AccountResult<Option<User>> {
        let user = self
            .repository
            .find_user_by_email(&normalize_email(email))
            .await?;

        Ok(user)
    }

    /// Return the active user matching `email` and `password`
    ///
    /// A successful match records the login time.
    pub async fn authenticate(&self, email: &str, password: &str) -> AccountResult<Option<User>> {
        let Some(mut user) = self.get_by_email(email).await? else {
            return Ok(None);
        };

        if !user.is_active || !user.check_password(password) {
            warn!("Authentication failed for {}", user.email);
            return Ok(None);
        }

        user.last_login = Some(chrono::Utc::now());
        let user = self.repository.update_user(&user).await?;

        Ok(Some(user))
    }

    /// Delete a user; owned recipes, tags and ingredients go with it
    pub async fn delete_user(&self, id: Uuid) -> AccountResult<bool> {
        info!("Deleting user: {}", id);

        let deleted = self.repository.delete_user(id).await?;
        Ok(deleted)
    }
}
