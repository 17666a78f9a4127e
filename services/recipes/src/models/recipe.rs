//! Recipe model and related functionality

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::Price;

/// Recipe entity owned by a single user
///
/// Tags and ingredients are linked through join tables and are read via
/// `RecipeRepository`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub serves: i32,
    pub calories_serve: Option<i32>,
    pub difficulty: i16,
    pub rating: i16,
    pub time_minutes: i32,
    pub price: Price,
    pub link: String,
    /// Relative storage path produced by `uploads::recipe_image_file_path`
    pub image: Option<String>,
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Recipe {}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// New recipe creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub serves: i32,
    pub calories_serve: Option<i32>,
    pub difficulty: i16,
    pub rating: i16,
    pub time_minutes: i32,
    pub price: Price,
    pub link: String,
}

impl NewRecipe {
    /// Payload with every optional column at its default
    pub fn new(user_id: Uuid, title: impl Into<String>, price: Price) -> Self {
        Self {
            user_id,
            title: title.into(),
            description: String::new(),
            serves: 2,
            calories_serve: None,
            difficulty: 0,
            rating: 0,
            time_minutes: 0,
            price,
            link: String::new(),
        }
    }
}
