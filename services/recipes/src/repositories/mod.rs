//! Repositories for persisting users, recipes, tags and ingredients
//!
//! The traits describe what the domain needs from storage. Both
//! implementations enforce the same constraints: unique user email,
//! required owner, non-negative small integers, column lengths, text
//! without NUL bytes, and cascade deletes from a user to everything it
//! owns.

use async_trait::async_trait;
use common::error::DatabaseError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Ingredient, NewIngredient, NewRecipe, NewTag, NewUser, Recipe, Tag, User};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

/// PostgreSQL SQLSTATE for `string_data_right_truncation`
const STRING_TOO_LONG: &str = "22001";

/// PostgreSQL SQLSTATE for `character_not_in_repertoire`, raised for NUL bytes
const INVALID_TEXT: &str = "22021";

/// Storage-constraint and connectivity errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("duplicate key value violates unique constraint \"{constraint}\"")]
    UniqueViolation { constraint: String },

    #[error("insert or update violates foreign key constraint \"{constraint}\"")]
    ForeignKeyViolation { constraint: String },

    #[error("new row violates check constraint \"{constraint}\"")]
    CheckViolation { constraint: String },

    #[error("{message}")]
    ValueTooLong { message: String },

    #[error("{message}")]
    InvalidText { message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Type alias for repository results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        if let sqlx::Error::Database(db_error) = &error {
            let constraint = db_error.constraint().unwrap_or_default().to_string();
            match db_error.kind() {
                ErrorKind::UniqueViolation => return Self::UniqueViolation { constraint },
                ErrorKind::ForeignKeyViolation => return Self::ForeignKeyViolation { constraint },
                ErrorKind::CheckViolation => return Self::CheckViolation { constraint },
                _ if db_error.code().as_deref() == Some(STRING_TOO_LONG) => {
                    return Self::ValueTooLong {
                        message: db_error.message().to_string(),
                    };
                }
                _ if db_error.code().as_deref() == Some(INVALID_TEXT) => {
                    return Self::InvalidText {
                        message: db_error.message().to_string(),
                    };
                }
                _ => {}
            }
        }

        Self::Database(DatabaseError::Query(error))
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; the primary key and timestamps are assigned by storage
    async fn insert_user(&self, new_user: &NewUser) -> RepositoryResult<User>;

    /// Persist every mutable column of `user`
    async fn update_user(&self, user: &User) -> RepositoryResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    /// Exact match on the stored (normalized) email
    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    async fn list_users(&self) -> RepositoryResult<Vec<User>>;

    /// Delete a user and everything it owns
    async fn delete_user(&self, id: Uuid) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn insert_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;

    async fn update_recipe(&self, recipe: &Recipe) -> RepositoryResult<Recipe>;

    async fn find_recipe_by_id(&self, id: Uuid) -> RepositoryResult<Option<Recipe>>;

    /// Recipes owned by `user_id`, ordered by title
    async fn list_recipes_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Recipe>>;

    async fn delete_recipe(&self, id: Uuid) -> RepositoryResult<bool>;

    /// Link a tag to a recipe; linking twice is a no-op
    async fn add_recipe_tag(&self, recipe_id: Uuid, tag_id: Uuid) -> RepositoryResult<()>;

    async fn remove_recipe_tag(&self, recipe_id: Uuid, tag_id: Uuid) -> RepositoryResult<bool>;

    /// Tags linked to a recipe, ordered by name
    async fn list_recipe_tags(&self, recipe_id: Uuid) -> RepositoryResult<Vec<Tag>>;

    /// Link an ingredient to a recipe; linking twice is a no-op
    async fn add_recipe_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
    ) -> RepositoryResult<()>;

    async fn remove_recipe_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
    ) -> RepositoryResult<bool>;

    /// Ingredients linked to a recipe, ordered by name
    async fn list_recipe_ingredients(&self, recipe_id: Uuid) -> RepositoryResult<Vec<Ingredient>>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn insert_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;

    async fn update_tag(&self, tag: &Tag) -> RepositoryResult<Tag>;

    async fn find_tag_by_id(&self, id: Uuid) -> RepositoryResult<Option<Tag>>;

    /// Tags owned by `user_id`, ordered by name
    async fn list_tags_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Tag>>;

    async fn delete_tag(&self, id: Uuid) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait IngredientRepository: Send + Sync {
    async fn insert_ingredient(&self, ingredient: &NewIngredient) -> RepositoryResult<Ingredient>;

    async fn update_ingredient(&self, ingredient: &Ingredient) -> RepositoryResult<Ingredient>;

    async fn find_ingredient_by_id(&self, id: Uuid) -> RepositoryResult<Option<Ingredient>>;

    /// Ingredients owned by `user_id`, ordered by name
    async fn list_ingredients_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Ingredient>>;

    async fn delete_ingredient(&self, id: Uuid) -> RepositoryResult<bool>;
}
