//! Ingredient model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Ingredient for recipes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Non-negative quantity, enforced by a check constraint
    pub amount: Option<i16>,
    /// At most 15 characters
    pub units: Option<String>,
}

impl PartialEq for Ingredient {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Ingredient {}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// New ingredient creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIngredient {
    pub user_id: Uuid,
    pub name: String,
    pub amount: Option<i16>,
    pub units: Option<String>,
}

impl NewIngredient {
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            amount: None,
            units: None,
        }
    }

    pub fn with_amount(mut self, amount: i16, units: impl Into<String>) -> Self {
        self.amount = Some(amount);
        self.units = Some(units.into());
        self
    }
}
