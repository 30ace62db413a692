//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the HTTP layer.

pub mod recipes;

pub use recipes::RecipeService;
