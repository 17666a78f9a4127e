//! Recipe domain models

pub mod ingredient;
pub mod price;
pub mod recipe;
pub mod tag;
pub mod user;

// Re-export for convenience
pub use ingredient::{Ingredient, NewIngredient};
pub use price::Price;
pub use recipe::{NewRecipe, Recipe};
pub use tag::{NewTag, Tag};
pub use user::{NewUser, User, UserFields};
