//! Recipe service
//!
//! Business logic for the nested create/update of recipes and their
//! ingredients. Ingredient entries are always inserted fresh under their
//! owning recipe; replacing a recipe's ingredient set deletes every owned
//! row first and recreates the new entries. Each operation runs inside a
//! single transaction so the recipe write and any ingredient churn commit
//! or roll back together.

use crate::error::ApiError;
use crate::repositories::{
    CreateRecipe, IngredientRecord, IngredientRepository, RecipeRecord, RecipeRepository,
};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Input for creating a recipe
#[derive(Debug, Clone)]
pub struct CreateRecipeInput {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
}

/// Input for updating a recipe (full or partial)
///
/// `None` means the field was omitted and keeps its stored value. A
/// `Some(vec![])` for `ingredients` clears the set.
#[derive(Debug, Clone, Default)]
pub struct UpdateRecipeInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
}

/// A recipe together with its owned ingredients
#[derive(Debug, Clone)]
pub struct RecipeWithIngredients {
    pub recipe: RecipeRecord,
    pub ingredients: Vec<IngredientRecord>,
}

/// Recipe service for business logic
pub struct RecipeService;

impl RecipeService {
    /// Create a recipe and its ingredient entries
    ///
    /// The recipe row is inserted first to obtain its identifier, then one
    /// ingredient row per entry. No lookup or merge against existing
    /// ingredient rows happens, even for identical names on other recipes.
    pub async fn create(
        pool: &PgPool,
        input: CreateRecipeInput,
    ) -> Result<RecipeWithIngredients, ApiError> {
        let mut tx = pool.begin().await?;

        let recipe = RecipeRepository::create(
            &mut *tx,
            &CreateRecipe {
                name: input.name,
                description: input.description,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        let mut ingredients = Vec::with_capacity(input.ingredients.len());
        for name in &input.ingredients {
            let ingredient = IngredientRepository::create(&mut *tx, recipe.id, name)
                .await
                .map_err(ApiError::Internal)?;
            ingredients.push(ingredient);
        }

        tx.commit().await?;

        debug!(id = %recipe.id, recipe = %recipe, count = ingredients.len(), "Recipe created");

        Ok(RecipeWithIngredients {
            recipe,
            ingredients,
        })
    }

    /// Fetch a single recipe with its ingredients
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<RecipeWithIngredients, ApiError> {
        let recipe = RecipeRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| not_found(id))?;

        let ingredients = IngredientRepository::get_by_recipe(pool, id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(RecipeWithIngredients {
            recipe,
            ingredients,
        })
    }

    /// List recipes ordered by descending name, optionally filtered to a
    /// case-sensitive name prefix
    pub async fn list(
        pool: &PgPool,
        name_prefix: Option<&str>,
    ) -> Result<Vec<RecipeWithIngredients>, ApiError> {
        let escaped = name_prefix.map(escape_like_prefix);
        let recipes = RecipeRepository::list(pool, escaped.as_deref())
            .await
            .map_err(ApiError::Internal)?;

        if recipes.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
        let mut by_recipe: HashMap<Uuid, Vec<IngredientRecord>> = HashMap::new();
        for ingredient in IngredientRepository::get_by_recipes(pool, &ids)
            .await
            .map_err(ApiError::Internal)?
        {
            by_recipe
                .entry(ingredient.recipe_id)
                .or_default()
                .push(ingredient);
        }

        Ok(recipes
            .into_iter()
            .map(|recipe| {
                let ingredients = by_recipe.remove(&recipe.id).unwrap_or_default();
                RecipeWithIngredients {
                    recipe,
                    ingredients,
                }
            })
            .collect())
    }

    /// Update a recipe, full or partial
    ///
    /// Omitted scalar fields keep their stored value. An omitted
    /// `ingredients` leaves the set untouched; a present one deletes every
    /// owned ingredient row and recreates the new entries, so an empty list
    /// clears the set.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: UpdateRecipeInput,
    ) -> Result<RecipeWithIngredients, ApiError> {
        let mut tx = pool.begin().await?;

        let existing = RecipeRepository::find_by_id(&mut *tx, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| not_found(id))?;

        let name = input.name.unwrap_or(existing.name);
        let description = input.description.unwrap_or(existing.description);

        let recipe = RecipeRepository::update(&mut *tx, id, &name, &description)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| not_found(id))?;

        if let Some(names) = input.ingredients {
            IngredientRepository::delete_by_recipe(&mut *tx, id)
                .await
                .map_err(ApiError::Internal)?;
            for name in &names {
                IngredientRepository::create(&mut *tx, id, name)
                    .await
                    .map_err(ApiError::Internal)?;
            }
        }

        let ingredients = IngredientRepository::get_by_recipe(&mut *tx, id)
            .await
            .map_err(ApiError::Internal)?;

        tx.commit().await?;

        debug!(id = %recipe.id, recipe = %recipe, "Recipe updated");

        Ok(RecipeWithIngredients {
            recipe,
            ingredients,
        })
    }

    /// Delete a recipe; its ingredients are removed by the cascade
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let deleted = RecipeRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?;

        if deleted {
            debug!(id = %id, "Recipe deleted");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Recipe {} not found", id))
}

/// Escape LIKE metacharacters so a user-supplied prefix matches literally
fn escape_like_prefix(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("Baco", "Baco")]
    #[case("100% rye", "100\\% rye")]
    #[case("a_b", "a\\_b")]
    #[case("back\\slash", "back\\\\slash")]
    #[case("", "")]
    fn like_prefix_is_escaped(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_like_prefix(input), expected);
    }

    proptest! {
        /// Every LIKE metacharacter in the output is preceded by a backslash
        #[test]
        fn escaped_prefix_has_no_bare_metacharacters(input in ".*") {
            let escaped = escape_like_prefix(&input);
            let chars: Vec<char> = escaped.chars().collect();
            let mut i = 0;
            while i < chars.len() {
                if chars[i] == '\\' {
                    prop_assert!(matches!(chars.get(i + 1), Some('%' | '_' | '\\')));
                    i += 2;
                } else {
                    prop_assert!(chars[i] != '%' && chars[i] != '_');
                    i += 1;
                }
            }
        }

        /// Escaping never changes the characters being matched
        #[test]
        fn escaping_round_trips(input in ".*") {
            let escaped = escape_like_prefix(&input);
            let unescaped: String = {
                let mut out = String::new();
                let mut iter = escaped.chars();
                while let Some(c) = iter.next() {
                    if c == '\\' {
                        out.push(iter.next().unwrap());
                    } else {
                        out.push(c);
                    }
                }
                out
            };
            prop_assert_eq!(unescaped, input);
        }
    }
}
