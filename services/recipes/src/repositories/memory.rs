//! In-memory repository
//!
//! Mirrors the PostgreSQL schema closely enough to be a drop-in store for
//! tests and embedded use: primary keys are generated on insert and every
//! constraint from the migrations is checked under a single lock, so each
//! call is atomic.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    IngredientRepository, RecipeRepository, RepositoryError, RepositoryResult, TagRepository,
    UserRepository,
};
use crate::models::{Ingredient, NewIngredient, NewRecipe, NewTag, NewUser, Recipe, Tag, User};

const MAX_CHAR_LENGTH: usize = 255;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_IMAGE_LENGTH: usize = 100;
const MAX_UNITS_LENGTH: usize = 15;

/// Message PostgreSQL reports for a NUL byte in a text value
const NUL_BYTE_MESSAGE: &str = "invalid byte sequence for encoding \"UTF8\": 0x00";

/// Rows of every table, keyed by primary key
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    recipes: HashMap<Uuid, Recipe>,
    tags: HashMap<Uuid, Tag>,
    ingredients: HashMap<Uuid, Ingredient>,
    recipe_tags: HashSet<(Uuid, Uuid)>,
    recipe_ingredients: HashSet<(Uuid, Uuid)>,
}

impl Tables {
    fn require_owner(&self, user_id: Uuid, constraint: &str) -> RepositoryResult<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(foreign_key_violation(constraint))
        }
    }

    fn check_unique_email(&self, email: &str, except: Option<Uuid>) -> RepositoryResult<()> {
        let taken = self
            .users
            .values()
            .any(|user| user.email == email && Some(user.id) != except);

        if taken {
            return Err(RepositoryError::UniqueViolation {
                constraint: "users_email_key".to_string(),
            });
        }
        Ok(())
    }

    fn delete_recipe(&mut self, id: Uuid) -> bool {
        self.recipe_tags.retain(|&(recipe, _)| recipe != id);
        self.recipe_ingredients.retain(|&(recipe, _)| recipe != id);
        self.recipes.remove(&id).is_some()
    }

    fn delete_tag(&mut self, id: Uuid) -> bool {
        self.recipe_tags.retain(|&(_, linked)| linked != id);
        self.tags.remove(&id).is_some()
    }

    fn delete_ingredient(&mut self, id: Uuid) -> bool {
        self.recipe_ingredients.retain(|&(_, linked)| linked != id);
        self.ingredients.remove(&id).is_some()
    }
}

fn foreign_key_violation(constraint: &str) -> RepositoryError {
    RepositoryError::ForeignKeyViolation {
        constraint: constraint.to_string(),
    }
}

/// PostgreSQL text columns cannot hold NUL bytes
fn check_text(value: &str) -> RepositoryResult<()> {
    if value.contains('\0') {
        return Err(RepositoryError::InvalidText {
            message: NUL_BYTE_MESSAGE.to_string(),
        });
    }
    Ok(())
}

fn check_length(value: &str, max: usize) -> RepositoryResult<()> {
    check_text(value)?;
    if value.chars().count() > max {
        return Err(RepositoryError::ValueTooLong {
            message: format!("value too long for type character varying({})", max),
        });
    }
    Ok(())
}

fn check_non_negative(value: Option<i16>, constraint: &str) -> RepositoryResult<()> {
    match value {
        Some(value) if value < 0 => Err(RepositoryError::CheckViolation {
            constraint: constraint.to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_user(email: &str, name: &str, password_hash: &str) -> RepositoryResult<()> {
    check_length(email, MAX_CHAR_LENGTH)?;
    check_length(name, MAX_CHAR_LENGTH)?;
    check_length(password_hash, MAX_PASSWORD_LENGTH)
}

fn validate_recipe(
    title: &str,
    description: &str,
    link: &str,
    difficulty: i16,
    rating: i16,
    image: Option<&str>,
) -> RepositoryResult<()> {
    check_length(title, MAX_CHAR_LENGTH)?;
    check_text(description)?;
    check_length(link, MAX_CHAR_LENGTH)?;
    if let Some(image) = image {
        check_length(image, MAX_IMAGE_LENGTH)?;
    }
    check_non_negative(Some(difficulty), "recipes_difficulty_check")?;
    check_non_negative(Some(rating), "recipes_rating_check")
}

fn validate_ingredient(
    name: &str,
    amount: Option<i16>,
    units: Option<&str>,
) -> RepositoryResult<()> {
    check_length(name, MAX_CHAR_LENGTH)?;
    if let Some(units) = units {
        check_length(units, MAX_UNITS_LENGTH)?;
    }
    check_non_negative(amount, "ingredients_amount_check")
}

/// In-memory repository implementing every repository trait
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        info!("Creating new user: {}", new_user.email);

        let mut tables = self.tables.lock().await;
        validate_user(&new_user.email, &new_user.name, &new_user.password_hash)?;
        tables.check_unique_email(&new_user.email, None)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            password_hash: new_user.password_hash.clone(),
            is_active: new_user.is_active,
            is_staff: new_user.is_staff,
            is_superuser: new_user.is_superuser,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_user(&self, user: &User) -> RepositoryResult<User> {
        info!("Updating user: {}", user.id);

        let mut tables = self.tables.lock().await;
        validate_user(&user.email, &user.name, &user.password_hash)?;
        tables.check_unique_email(&user.email, Some(user.id))?;

        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or(RepositoryError::NotFound {
                entity: "user",
                id: user.id,
            })?;

        let created_at = stored.created_at;
        *stored = User {
            created_at,
            updated_at: Utc::now(),
            ..user.clone()
        };

        Ok(stored.clone())
    }

    async fn find_user_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let tables = self.tables.lock().await;
        let user = tables.users.values().find(|user| user.email == email);
        Ok(user.cloned())
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let tables = self.tables.lock().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|user| user.email.clone());
        Ok(users)
    }

    async fn delete_user(&self, id: Uuid) -> RepositoryResult<bool> {
        info!("Deleting user: {}", id);

        let mut tables = self.tables.lock().await;
        if tables.users.remove(&id).is_none() {
            warn!("User {} not found for deletion", id);
            return Ok(false);
        }

        let owned_recipes: Vec<Uuid> = tables
            .recipes
            .values()
            .filter(|recipe| recipe.user_id == id)
            .map(|recipe| recipe.id)
            .collect();
        let owned_tags: Vec<Uuid> = tables
            .tags
            .values()
            .filter(|tag| tag.user_id == id)
            .map(|tag| tag.id)
            .collect();
        let owned_ingredients: Vec<Uuid> = tables
            .ingredients
            .values()
            .filter(|ingredient| ingredient.user_id == id)
            .map(|ingredient| ingredient.id)
            .collect();

        for recipe_id in owned_recipes {
            tables.delete_recipe(recipe_id);
        }
        for tag_id in owned_tags {
            tables.delete_tag(tag_id);
        }
        for ingredient_id in owned_ingredients {
            tables.delete_ingredient(ingredient_id);
        }

        Ok(true)
    }
}

#[async_trait]
impl RecipeRepository for InMemoryRepository {
    async fn insert_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe> {
        info!("Creating new recipe: {}", new_recipe.title);

        let mut tables = self.tables.lock().await;
        validate_recipe(
            &new_recipe.title,
            &new_recipe.description,
            &new_recipe.link,
            new_recipe.difficulty,
            new_recipe.rating,
            None,
        )?;
        tables.require_owner(new_recipe.user_id, "recipes_user_id_fkey")?;

        let recipe = Recipe {
            id: Uuid::new_v4(),
            user_id: new_recipe.user_id,
            title: new_recipe.title.clone(),
            description: new_recipe.description.clone(),
            serves: new_recipe.serves,
            calories_serve: new_recipe.calories_serve,
            difficulty: new_recipe.difficulty,
            rating: new_recipe.rating,
            time_minutes: new_recipe.time_minutes,
            price: new_recipe.price,
            link: new_recipe.link.clone(),
            image: None,
        };
        tables.recipes.insert(recipe.id, recipe.clone());

        Ok(recipe)
    }

    async fn update_recipe(&self, recipe: &Recipe) -> RepositoryResult<Recipe> {
        info!("Updating recipe: {}", recipe.id);

        let mut tables = self.tables.lock().await;
        validate_recipe(
            &recipe.title,
            &recipe.description,
            &recipe.link,
            recipe.difficulty,
            recipe.rating,
            recipe.image.as_deref(),
        )?;
        tables.require_owner(recipe.user_id, "recipes_user_id_fkey")?;

        let stored = tables
            .recipes
            .get_mut(&recipe.id)
            .ok_or(RepositoryError::NotFound {
                entity: "recipe",
                id: recipe.id,
            })?;
        *stored = recipe.clone();

        Ok(stored.clone())
    }

    async fn find_recipe_by_id(&self, id: Uuid) -> RepositoryResult<Option<Recipe>> {
        let tables = self.tables.lock().await;
        Ok(tables.recipes.get(&id).cloned())
    }

    async fn list_recipes_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Recipe>> {
        let tables = self.tables.lock().await;
        let mut recipes: Vec<Recipe> = tables
            .recipes
            .values()
            .filter(|recipe| recipe.user_id == user_id)
            .cloned()
            .collect();
        recipes.sort_by_key(|recipe| (recipe.title.clone(), recipe.id));
        Ok(recipes)
    }

    async fn delete_recipe(&self, id: Uuid) -> RepositoryResult<bool> {
        info!("Deleting recipe: {}", id);

        let mut tables = self.tables.lock().await;
        Ok(tables.delete_recipe(id))
    }

    async fn add_recipe_tag(&self, recipe_id: Uuid, tag_id: Uuid) -> RepositoryResult<()> {
        let mut tables = self.tables.lock().await;
        if !tables.recipes.contains_key(&recipe_id) {
            return Err(foreign_key_violation("recipe_tags_recipe_id_fkey"));
        }
        if !tables.tags.contains_key(&tag_id) {
            return Err(foreign_key_violation("recipe_tags_tag_id_fkey"));
        }

        tables.recipe_tags.insert((recipe_id, tag_id));
        Ok(())
    }

    async fn remove_recipe_tag(&self, recipe_id: Uuid, tag_id: Uuid) -> RepositoryResult<bool> {
        let mut tables = self.tables.lock().await;
        Ok(tables.recipe_tags.remove(&(recipe_id, tag_id)))
    }

    async fn list_recipe_tags(&self, recipe_id: Uuid) -> RepositoryResult<Vec<Tag>> {
        let tables = self.tables.lock().await;
        let mut tags: Vec<Tag> = tables
            .recipe_tags
            .iter()
            .filter(|(linked_recipe, _)| *linked_recipe == recipe_id)
            .filter_map(|(_, tag_id)| tables.tags.get(tag_id).cloned())
            .collect();
        tags.sort_by_key(|tag| (tag.name.clone(), tag.id));
        Ok(tags)
    }

    async fn add_recipe_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
    ) -> RepositoryResult<()> {
        let mut tables = self.tables.lock().await;
        if !tables.recipes.contains_key(&recipe_id) {
            return Err(foreign_key_violation("recipe_ingredients_recipe_id_fkey"));
        }
        if !tables.ingredients.contains_key(&ingredient_id) {
            let constraint = "recipe_ingredients_ingredient_id_fkey";
            return Err(foreign_key_violation(constraint));
        }

        tables.recipe_ingredients.insert((recipe_id, ingredient_id));
        Ok(())
    }

    async fn remove_recipe_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
    ) -> RepositoryResult<bool> {
        let mut tables = self.tables.lock().await;
        let link = (recipe_id, ingredient_id);
        Ok(tables.recipe_ingredients.remove(&link))
    }

    async fn list_recipe_ingredients(&self, recipe_id: Uuid) -> RepositoryResult<Vec<Ingredient>> {
        let tables = self.tables.lock().await;
        let mut ingredients: Vec<Ingredient> = tables
            .recipe_ingredients
            .iter()
            .filter(|(linked_recipe, _)| *linked_recipe == recipe_id)
            .filter_map(|(_, ingredient_id)| tables.ingredients.get(ingredient_id).cloned())
            .collect();
        ingredients.sort_by_key(|ingredient| (ingredient.name.clone(), ingredient.id));
        Ok(ingredients)
    }
}

#[async_trait]
impl TagRepository for InMemoryRepository {
    async fn insert_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag> {
        info!("Creating new tag: {}", new_tag.name);

        let mut tables = self.tables.lock().await;
        check_length(&new_tag.name, MAX_CHAR_LENGTH)?;
        tables.require_owner(new_tag.user_id, "tags_user_id_fkey")?;

        let tag = Tag {
            id: Uuid::new_v4(),
            user_id: new_tag.user_id,
            name: new_tag.name.clone(),
        };
        tables.tags.insert(tag.id, tag.clone());

        Ok(tag)
    }

    async fn update_tag(&self, tag: &Tag) -> RepositoryResult<Tag> {
        let mut tables = self.tables.lock().await;
        check_length(&tag.name, MAX_CHAR_LENGTH)?;
        tables.require_owner(tag.user_id, "tags_user_id_fkey")?;

        let stored = tables
            .tags
            .get_mut(&tag.id)
            .ok_or(RepositoryError::NotFound {
                entity: "tag",
                id: tag.id,
            })?;
        *stored = tag.clone();

        Ok(stored.clone())
    }

    async fn find_tag_by_id(&self, id: Uuid) -> RepositoryResult<Option<Tag>> {
        let tables = self.tables.lock().await;
        Ok(tables.tags.get(&id).cloned())
    }

    async fn list_tags_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Tag>> {
        let tables = self.tables.lock().await;
        let mut tags: Vec<Tag> = tables
            .tags
            .values()
            .filter(|tag| tag.user_id == user_id)
            .cloned()
            .collect();
        tags.sort_by_key(|tag| (tag.name.clone(), tag.id));
        Ok(tags)
    }

    async fn delete_tag(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut tables = self.tables.lock().await;
        Ok(tables.delete_tag(id))
    }
}

#[async_trait]
impl IngredientRepository for InMemoryRepository {
    async fn insert_ingredient(&self, ingredient: &NewIngredient) -> RepositoryResult<Ingredient> {
        info!("Creating new ingredient: {}", ingredient.name);

        let mut tables = self.tables.lock().await;
        validate_ingredient(
            &ingredient.name,
            ingredient.amount,
            ingredient.units.as_deref(),
        )?;
        tables.require_owner(ingredient.user_id, "ingredients_user_id_fkey")?;

        let row = Ingredient {
            id: Uuid::new_v4(),
            user_id: ingredient.user_id,
            name: ingredient.name.clone(),
            amount: ingredient.amount,
            units: ingredient.units.clone(),
        };
        tables.ingredients.insert(row.id, row.clone());

        Ok(row)
    }

    async fn update_ingredient(&self, ingredient: &Ingredient) -> RepositoryResult<Ingredient> {
        let mut tables = self.tables.lock().await;
        validate_ingredient(
            &ingredient.name,
            ingredient.amount,
            ingredient.units.as_deref(),
        )?;
        tables.require_owner(ingredient.user_id, "ingredients_user_id_fkey")?;

        let stored = tables
            .ingredients
            .get_mut(&ingredient.id)
            .ok_or(RepositoryError::NotFound {
                entity: "ingredient",
                id: ingredient.id,
            })?;
        *stored = ingredient.clone();

        Ok(stored.clone())
    }

    async fn find_ingredient_by_id(&self, id: Uuid) -> RepositoryResult<Option<Ingredient>> {
        let tables = self.tables.lock().await;
        Ok(tables.ingredients.get(&id).cloned())
    }

    async fn list_ingredients_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Ingredient>> {
        let tables = self.tables.lock().await;
        let mut ingredients: Vec<Ingredient> = tables
            .ingredients
            .values()
            .filter(|ingredient| ingredient.user_id == user_id)
            .cloned()
            .collect();
        ingredients.sort_by_key(|ingredient| (ingredient.name.clone(), ingredient.id));
        Ok(ingredients)
    }

    async fn delete_ingredient(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut tables = self.tables.lock().await;
        Ok(tables.delete_ingredient(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Price, UserFields};
    use rust_decimal::Decimal;

    fn price() -> Price {
        Price::new(Decimal::new(500, 2)).unwrap()
    }

    async fn create_user(repository: &InMemoryRepository, email: &str) -> User {
        let new_user = NewUser::new(email, "!", UserFields::default());
        repository.insert_user(&new_user).await.unwrap()
    }

    async fn create_recipe(repository: &InMemoryRepository, user: &User, title: &str) -> Recipe {
        let new_recipe = NewRecipe::new(user.id, title, price());
        repository.insert_recipe(&new_recipe).await.unwrap()
    }

    async fn create_tag(repository: &InMemoryRepository, user: &User, name: &str) -> Tag {
        let new_tag = NewTag::new(user.id, name);
        repository.insert_tag(&new_tag).await.unwrap()
    }

    async fn create_ingredient(
        repository: &InMemoryRepository,
        user: &User,
        name: &str,
    ) -> Ingredient {
        let ingredient = NewIngredient::new(user.id, name);
        repository.insert_ingredient(&ingredient).await.unwrap()
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let repository = InMemoryRepository::new();
        create_user(&repository, "test@example.com").await;

        let duplicate = NewUser::new("test@example.com", "!", UserFields::default());
        let result = repository.insert_user(&duplicate).await;

        match result {
            Err(RepositoryError::UniqueViolation { constraint }) => {
                assert_eq!(constraint, "users_email_key")
            }
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_user_keeps_email_unique() {
        let repository = InMemoryRepository::new();
        create_user(&repository, "first@example.com").await;
        let mut second = create_user(&repository, "second@example.com").await;

        second.email = "first@example.com".to_string();
        let result = repository.update_user(&second).await;
        assert!(matches!(
            result,
            Err(RepositoryError::UniqueViolation { .. })
        ));

        second.email = "second@example.com".to_string();
        second.is_staff = true;
        let updated = repository.update_user(&second).await.unwrap();
        assert!(updated.is_staff);
        assert_eq!(updated.created_at, second.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_rows_is_not_found() {
        let repository = InMemoryRepository::new();
        let user = create_user(&repository, "test@example.com").await;
        let tag = create_tag(&repository, &user, "Vegan").await;
        repository.delete_tag(tag.id).await.unwrap();

        let result = repository.update_tag(&tag).await;
        assert!(matches!(
            result,
            Err(RepositoryError::NotFound { entity: "tag", .. })
        ));
    }

    #[tokio::test]
    async fn test_owner_is_required() {
        let repository = InMemoryRepository::new();
        let missing_owner = Uuid::new_v4();

        let new_recipe = NewRecipe::new(missing_owner, "Orphan", price());
        let recipe = repository.insert_recipe(&new_recipe).await;
        let new_tag = NewTag::new(missing_owner, "Orphan");
        let tag = repository.insert_tag(&new_tag).await;
        let new_ingredient = NewIngredient::new(missing_owner, "Orphan");
        let ingredient = repository.insert_ingredient(&new_ingredient).await;

        assert!(matches!(
            recipe,
            Err(RepositoryError::ForeignKeyViolation { .. })
        ));
        assert!(matches!(
            tag,
            Err(RepositoryError::ForeignKeyViolation { .. })
        ));
        assert!(matches!(
            ingredient,
            Err(RepositoryError::ForeignKeyViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_small_integers_must_be_non_negative() {
        let repository = InMemoryRepository::new();
        let user = create_user(&repository, "test@example.com").await;

        let mut new_recipe = NewRecipe::new(user.id, "Sample recipe", price());
        new_recipe.rating = -1;
        let result = repository.insert_recipe(&new_recipe).await;
        match result {
            Err(RepositoryError::CheckViolation { constraint }) => {
                assert_eq!(constraint, "recipes_rating_check")
            }
            other => panic!("expected check violation, got {other:?}"),
        }

        let ingredient = NewIngredient::new(user.id, "Salt").with_amount(-2, "g");
        assert!(matches!(
            repository.insert_ingredient(&ingredient).await,
            Err(RepositoryError::CheckViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_column_lengths_are_enforced() {
        let repository = InMemoryRepository::new();
        let user = create_user(&repository, "test@example.com").await;

        let ingredient = NewIngredient::new(user.id, "Flour").with_amount(2, "a".repeat(16));
        let result = repository.insert_ingredient(&ingredient).await;
        match result {
            Err(RepositoryError::ValueTooLong { message }) => {
                assert_eq!(message, "value too long for type character varying(15)")
            }
            other => panic!("expected value too long, got {other:?}"),
        }

        let ingredient = NewIngredient::new(user.id, "Flour").with_amount(2, "a".repeat(15));
        assert!(repository.insert_ingredient(&ingredient).await.is_ok());

        let tag = NewTag::new(user.id, "t".repeat(256));
        assert!(matches!(
            repository.insert_tag(&tag).await,
            Err(RepositoryError::ValueTooLong { .. })
        ));
    }

    #[tokio::test]
    async fn test_password_hash_length_is_enforced() {
        let repository = InMemoryRepository::new();

        let new_user = NewUser::new("a@example.com", "h".repeat(129), UserFields::default());
        match repository.insert_user(&new_user).await {
            Err(RepositoryError::ValueTooLong { message }) => {
                assert_eq!(message, "value too long for type character varying(128)")
            }
            other => panic!("expected value too long, got {other:?}"),
        }

        let new_user = NewUser::new("a@example.com", "h".repeat(128), UserFields::default());
        assert!(repository.insert_user(&new_user).await.is_ok());
    }

    #[tokio::test]
    async fn test_image_path_length_is_enforced() {
        let repository = InMemoryRepository::new();
        let user = create_user(&repository, "test@example.com").await;
        let mut recipe = create_recipe(&repository, &user, "Pancakes").await;

        recipe.image = Some(format!("uploads/recipe/{}", "i".repeat(86)));
        match repository.update_recipe(&recipe).await {
            Err(RepositoryError::ValueTooLong { message }) => {
                assert_eq!(message, "value too long for type character varying(100)")
            }
            other => panic!("expected value too long, got {other:?}"),
        }

        recipe.image = Some(format!("uploads/recipe/{}", "i".repeat(85)));
        let updated = repository.update_recipe(&recipe).await.unwrap();
        assert_eq!(updated.image.map(|image| image.len()), Some(100));
    }

    #[tokio::test]
    async fn test_text_with_nul_byte_is_rejected() {
        let repository = InMemoryRepository::new();
        let user = create_user(&repository, "test@example.com").await;

        let new_tag = NewTag::new(user.id, "Veg\0an");
        let result = repository.insert_tag(&new_tag).await;
        assert!(matches!(
            result,
            Err(RepositoryError::InvalidText { message }) if message == NUL_BYTE_MESSAGE
        ));

        let mut new_recipe = NewRecipe::new(user.id, "Pancakes", price());
        new_recipe.description = "Mix\0well".to_string();
        assert!(matches!(
            repository.insert_recipe(&new_recipe).await,
            Err(RepositoryError::InvalidText { .. })
        ));

        let new_user = NewUser::new("nul\0@example.com", "!", UserFields::default());
        assert!(matches!(
            repository.insert_user(&new_user).await,
            Err(RepositoryError::InvalidText { .. })
        ));

        let tags = repository.list_tags_by_user(user.id).await.unwrap();
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_tag_names_are_allowed() {
        let repository = InMemoryRepository::new();
        let user = create_user(&repository, "test@example.com").await;

        create_tag(&repository, &user, "Dessert").await;
        create_tag(&repository, &user, "Dessert").await;

        let tags = repository.list_tags_by_user(user.id).await.unwrap();
        assert_eq!(tags.len(), 2);
    }

    #[tokio::test]
    async fn test_recipe_tags_and_ingredients() -> RepositoryResult<()> {
        let repository = InMemoryRepository::new();
        let user = create_user(&repository, "test@example.com").await;
        let recipe = create_recipe(&repository, &user, "Pancakes").await;
        let sweet = create_tag(&repository, &user, "Sweet").await;
        let breakfast = create_tag(&repository, &user, "Breakfast").await;
        let egg = create_ingredient(&repository, &user, "Egg").await;

        repository.add_recipe_tag(recipe.id, sweet.id).await?;
        repository.add_recipe_tag(recipe.id, breakfast.id).await?;
        repository.add_recipe_tag(recipe.id, sweet.id).await?;
        repository.add_recipe_ingredient(recipe.id, egg.id).await?;

        let tags = repository.list_recipe_tags(recipe.id).await?;
        let names: Vec<String> = tags.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["Breakfast", "Sweet"]);
        let ingredients = repository.list_recipe_ingredients(recipe.id).await?;
        assert_eq!(ingredients, vec![egg]);

        assert!(repository.remove_recipe_tag(recipe.id, sweet.id).await?);
        assert!(!repository.remove_recipe_tag(recipe.id, sweet.id).await?);

        // deleting a tag unlinks it without touching the recipe
        repository.delete_tag(breakfast.id).await?;
        assert!(repository.list_recipe_tags(recipe.id).await?.is_empty());
        assert!(repository.find_recipe_by_id(recipe.id).await?.is_some());

        let missing = repository.add_recipe_tag(recipe.id, breakfast.id).await;
        assert!(matches!(
            missing,
            Err(RepositoryError::ForeignKeyViolation { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() -> RepositoryResult<()> {
        let repository = InMemoryRepository::new();
        let owner = create_user(&repository, "owner@example.com").await;
        let other = create_user(&repository, "other@example.com").await;

        let recipe = create_recipe(&repository, &owner, "Soup").await;
        let tag = create_tag(&repository, &owner, "Warm").await;
        let leek = create_ingredient(&repository, &owner, "Leek").await;
        repository.add_recipe_tag(recipe.id, tag.id).await?;
        repository.add_recipe_ingredient(recipe.id, leek.id).await?;

        // another user's recipe linked to the owner's tag
        let stew = create_recipe(&repository, &other, "Stew").await;
        repository.add_recipe_tag(stew.id, tag.id).await?;

        assert!(repository.delete_user(owner.id).await?);

        assert!(repository.find_recipe_by_id(recipe.id).await?.is_none());
        assert!(repository.find_tag_by_id(tag.id).await?.is_none());
        assert!(repository.find_ingredient_by_id(leek.id).await?.is_none());
        assert!(repository.list_recipe_tags(stew.id).await?.is_empty());
        assert!(repository.find_recipe_by_id(stew.id).await?.is_some());
        assert!(repository.find_user_by_id(other.id).await?.is_some());

        assert!(!repository.delete_user(owner.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_lists_are_scoped_to_owner_and_sorted() {
        let repository = InMemoryRepository::new();
        let owner = create_user(&repository, "owner@example.com").await;
        let other = create_user(&repository, "other@example.com").await;

        for title in ["Waffles", "Apple pie"] {
            create_recipe(&repository, &owner, title).await;
        }
        create_recipe(&repository, &other, "Toast").await;

        let recipes = repository.list_recipes_by_user(owner.id).await.unwrap();
        let titles: Vec<&str> = recipes.iter().map(|recipe| recipe.title.as_str()).collect();
        assert_eq!(titles, ["Apple pie", "Waffles"]);

        let users = repository.list_users().await.unwrap();
        let emails: Vec<&str> = users.iter().map(|user| user.email.as_str()).collect();
        assert_eq!(emails, ["other@example.com", "owner@example.com"]);
    }
}
