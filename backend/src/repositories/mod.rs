//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod recipes;

pub use recipes::{
    CreateRecipe, IngredientRecord, IngredientRepository, RecipeRecord, RecipeRepository,
};
