//! PostgreSQL repository for database operations
//!
//! Constraints and cascade deletes are enforced by the schema in
//! `migrations/`; this module only maps rows and errors.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{
    IngredientRepository, RecipeRepository, RepositoryError, RepositoryResult, TagRepository,
    UserRepository,
};
use crate::models::{Ingredient, NewIngredient, NewRecipe, NewTag, NewUser, Recipe, Tag, User};

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    /// Create a new repository on top of `pool`
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn insert_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        info!("Creating new user: {}", new_user.email);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash, is_active, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, name, password_hash, is_active, is_staff, is_superuser,
                      last_login, created_at, updated_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(new_user.is_active)
        .bind(new_user.is_staff)
        .bind(new_user.is_superuser)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(&self, user: &User) -> RepositoryResult<User> {
        info!("Updating user: {}", user.id);

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, name = $3, password_hash = $4, is_active = $5, is_staff = $6,
                is_superuser = $7, last_login = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, password_hash, is_active, is_staff, is_superuser,
                      last_login, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(user.last_login)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity: "user",
            id: user.id,
        })
    }

    async fn find_user_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        info!("Finding user by ID: {}", id);

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, is_active, is_staff, is_superuser,
                   last_login, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        info!("Finding user by email: {}", email);

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, is_active, is_staff, is_superuser,
                   last_login, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, is_active, is_staff, is_superuser,
                   last_login, created_at, updated_at
            FROM users
            ORDER BY email
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn delete_user(&self, id: Uuid) -> RepositoryResult<bool> {
        info!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RecipeRepository for PgRepository {
    async fn insert_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe> {
        info!("Creating new recipe: {}", new_recipe.title);

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (user_id, title, description, serves, calories_serve,
                                 difficulty, rating, time_minutes, price, link)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, title, description, serves, calories_serve, difficulty,
                      rating, time_minutes, price, link, image
            "#,
        )
        .bind(new_recipe.user_id)
        .bind(&new_recipe.title)
        .bind(&new_recipe.description)
        .bind(new_recipe.serves)
        .bind(new_recipe.calories_serve)
        .bind(new_recipe.difficulty)
        .bind(new_recipe.rating)
        .bind(new_recipe.time_minutes)
        .bind(new_recipe.price)
        .bind(&new_recipe.link)
        .fetch_one(&self.pool)
        .await?;

        Ok(recipe)
    }

    async fn update_recipe(&self, recipe: &Recipe) -> RepositoryResult<Recipe> {
        info!("Updating recipe: {}", recipe.id);

        sqlx::query_as::<_, Recipe>(
            r#"
            UPDATE recipes
            SET user_id = $2, title = $3, description = $4, serves = $5, calories_serve = $6,
                difficulty = $7, rating = $8, time_minutes = $9, price = $10, link = $11,
                image = $12
            WHERE id = $1
            RETURNING id, user_id, title, description, serves, calories_serve, difficulty,
                      rating, time_minutes, price, link, image
            "#,
        )
        .bind(recipe.id)
        .bind(recipe.user_id)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(recipe.serves)
        .bind(recipe.calories_serve)
        .bind(recipe.difficulty)
        .bind(recipe.rating)
        .bind(recipe.time_minutes)
        .bind(recipe.price)
        .bind(&recipe.link)
        .bind(&recipe.image)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity: "recipe",
            id: recipe.id,
        })
    }

    async fn find_recipe_by_id(&self, id: Uuid) -> RepositoryResult<Option<Recipe>> {
        info!("Finding recipe by ID: {}", id);

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, description, serves, calories_serve, difficulty,
                   rating, time_minutes, price, link, image
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(recipe)
    }

    async fn list_recipes_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, description, serves, calories_serve, difficulty,
                   rating, time_minutes, price, link, image
            FROM recipes
            WHERE user_id = $1
            ORDER BY title, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    async fn delete_recipe(&self, id: Uuid) -> RepositoryResult<bool> {
        info!("Deleting recipe: {}", id);

        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_recipe_tag(&self, recipe_id: Uuid, tag_id: Uuid) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recipe_tags (recipe_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(recipe_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_recipe_tag(&self, recipe_id: Uuid, tag_id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM recipe_tags
            WHERE recipe_id = $1 AND tag_id = $2
            "#,
        )
        .bind(recipe_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_recipe_tags(&self, recipe_id: Uuid) -> RepositoryResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.user_id, t.name
            FROM tags t
            JOIN recipe_tags rt ON rt.tag_id = t.id
            WHERE rt.recipe_id = $1
            ORDER BY t.name, t.id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn add_recipe_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
    ) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_recipe_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
    ) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM recipe_ingredients
            WHERE recipe_id = $1 AND ingredient_id = $2
            "#,
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_recipe_ingredients(&self, recipe_id: Uuid) -> RepositoryResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT i.id, i.user_id, i.name, i.amount, i.units
            FROM ingredients i
            JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
            WHERE ri.recipe_id = $1
            ORDER BY i.name, i.id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ingredients)
    }
}

#[async_trait]
impl TagRepository for PgRepository {
    async fn insert_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag> {
        info!("Creating new tag: {}", new_tag.name);

        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name
            "#,
        )
        .bind(new_tag.user_id)
        .bind(&new_tag.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(tag)
    }

    async fn update_tag(&self, tag: &Tag) -> RepositoryResult<Tag> {
        sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
            SET user_id = $2, name = $3
            WHERE id = $1
            RETURNING id, user_id, name
            "#,
        )
        .bind(tag.id)
        .bind(tag.user_id)
        .bind(&tag.name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity: "tag",
            id: tag.id,
        })
    }

    async fn find_tag_by_id(&self, id: Uuid) -> RepositoryResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, user_id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tag)
    }

    async fn list_tags_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, user_id, name
            FROM tags
            WHERE user_id = $1
            ORDER BY name, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn delete_tag(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl IngredientRepository for PgRepository {
    async fn insert_ingredient(&self, ingredient: &NewIngredient) -> RepositoryResult<Ingredient> {
        info!("Creating new ingredient: {}", ingredient.name);

        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (user_id, name, amount, units)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, amount, units
            "#,
        )
        .bind(ingredient.user_id)
        .bind(&ingredient.name)
        .bind(ingredient.amount)
        .bind(&ingredient.units)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_ingredient(&self, ingredient: &Ingredient) -> RepositoryResult<Ingredient> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            UPDATE ingredients
            SET user_id = $2, name = $3, amount = $4, units = $5
            WHERE id = $1
            RETURNING id, user_id, name, amount, units
            "#,
        )
        .bind(ingredient.id)
        .bind(ingredient.user_id)
        .bind(&ingredient.name)
        .bind(ingredient.amount)
        .bind(&ingredient.units)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity: "ingredient",
            id: ingredient.id,
        })
    }

    async fn find_ingredient_by_id(&self, id: Uuid) -> RepositoryResult<Option<Ingredient>> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "SELECT id, user_id, name, amount, units FROM ingredients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ingredient)
    }

    async fn list_ingredients_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, user_id, name, amount, units
            FROM ingredients
            WHERE user_id = $1
            ORDER BY name, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ingredients)
    }

    async fn delete_ingredient(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
