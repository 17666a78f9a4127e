//! Integration tests for the PostgreSQL repository
//!
//! These tests need a reachable database (see `DATABASE_URL`) and are
//! ignored by default. Run them with `cargo test -- --ignored`.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use recipes::models::{NewIngredient, NewRecipe, NewTag, Price, UserFields};
use recipes::repositories::{
    IngredientRepository, RecipeRepository, RepositoryError, TagRepository, UserRepository,
};
use recipes::uploads::assign_recipe_image;
use recipes::{AccountError, MIGRATOR, PgRepository, UserManager};
use rust_decimal::Decimal;
use uuid::Uuid;

async fn repository() -> Result<PgRepository, Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_pool(&config).await?;
    assert!(health_check(&pool).await?, "Database health check failed");
    run_migrations(&pool, &MIGRATOR).await?;

    Ok(PgRepository::new(pool))
}

fn unique_email() -> String {
    format!("user-{}@Example.COM", Uuid::new_v4())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_user_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let manager = UserManager::new(repository().await?);
    let email = unique_email();

    let user = manager.create_superuser(&email, "test123").await?;
    assert!(user.email.ends_with("@example.com"));
    assert!(user.is_staff && user.is_superuser);
    assert!(user.check_password("test123"));

    let duplicate = manager
        .create_user(&email, Some("test123"), UserFields::default())
        .await;
    assert!(matches!(
        duplicate.unwrap_err(),
        AccountError::Repository(RepositoryError::UniqueViolation { .. })
    ));

    assert!(manager.delete_user(user.id).await?);
    let deleted = manager.repository().find_user_by_id(user.id).await?;
    assert!(deleted.is_none());

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_constraints_and_cascade() -> Result<(), Box<dyn std::error::Error>> {
    let repository = repository().await?;
    let manager = UserManager::new(repository.clone());
    let user = manager
        .create_user(&unique_email(), Some("test123"), UserFields::default())
        .await?;

    let price = Price::new(Decimal::new(5, 0))?;
    let new_recipe = NewRecipe::new(user.id, "Sample recipe name", price);
    let recipe = repository.insert_recipe(&new_recipe).await?;
    assert_eq!(recipe.price.to_string(), "5.00");

    let tag = repository.insert_tag(&NewTag::new(user.id, "Tag1")).await?;
    let new_ingredient = NewIngredient::new(user.id, "Ingredient1").with_amount(1, "kg");
    let ingredient = repository.insert_ingredient(&new_ingredient).await?;
    repository.add_recipe_tag(recipe.id, tag.id).await?;
    repository.add_recipe_tag(recipe.id, tag.id).await?;
    repository
        .add_recipe_ingredient(recipe.id, ingredient.id)
        .await?;
    let tags = repository.list_recipe_tags(recipe.id).await?;
    assert_eq!(tags, vec![tag.clone()]);

    let salt = NewIngredient::new(user.id, "Salt").with_amount(-1, "g");
    let negative = repository.insert_ingredient(&salt).await;
    assert!(matches!(
        negative,
        Err(RepositoryError::CheckViolation { .. })
    ));

    let salt = NewIngredient::new(user.id, "Salt").with_amount(1, "a".repeat(16));
    let too_long = repository.insert_ingredient(&salt).await;
    assert!(matches!(
        too_long,
        Err(RepositoryError::ValueTooLong { .. })
    ));

    let vegan = NewTag::new(user.id, "Veg\0an");
    let nul = repository.insert_tag(&vegan).await;
    assert!(matches!(nul, Err(RepositoryError::InvalidText { .. })));

    let orphan = repository
        .insert_tag(&NewTag::new(Uuid::new_v4(), "Orphan"))
        .await;
    assert!(matches!(
        orphan,
        Err(RepositoryError::ForeignKeyViolation { .. })
    ));

    let recipe = assign_recipe_image(&repository, &recipe, "photo.jpg").await?;
    let image = recipe.image.as_deref().unwrap_or_default();
    assert!(image.ends_with(".jpg"));

    assert!(repository.delete_user(user.id).await?);
    assert!(repository.find_recipe_by_id(recipe.id).await?.is_none());
    assert!(repository.find_tag_by_id(tag.id).await?.is_none());
    let ingredient = repository.find_ingredient_by_id(ingredient.id).await?;
    assert!(ingredient.is_none());

    Ok(())
}
