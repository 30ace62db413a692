//! Recipe repository - database operations for recipes and their ingredients

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use std::fmt;
use uuid::Uuid;

/// Recipe from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Records display as their name, for logging only
impl fmt::Display for RecipeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ingredient from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IngredientRecord {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for IngredientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Input for creating a new recipe
#[derive(Debug, Clone)]
pub struct CreateRecipe {
    pub name: String,
    pub description: String,
}

/// Recipe repository
///
/// Methods take any `PgExecutor` so callers can run them on the pool or
/// inside a transaction.
pub struct RecipeRepository;

impl RecipeRepository {
    /// Create a new recipe
    pub async fn create(db: impl PgExecutor<'_>, input: &CreateRecipe) -> Result<RecipeRecord> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            INSERT INTO recipes (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(db)
        .await?;

        Ok(recipe)
    }

    /// Find recipe by ID
    pub async fn find_by_id(db: impl PgExecutor<'_>, id: Uuid) -> Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(recipe)
    }

    /// List recipes ordered by descending name, optionally filtered to an
    /// exact (case-sensitive) name prefix
    ///
    /// The prefix must already have its LIKE metacharacters escaped.
    pub async fn list(
        db: impl PgExecutor<'_>,
        escaped_prefix: Option<&str>,
    ) -> Result<Vec<RecipeRecord>> {
        let recipes = sqlx::query_as::<_, RecipeRecord>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM recipes
            WHERE $1::text IS NULL OR name LIKE $1 || '%' ESCAPE '\'
            ORDER BY name DESC
            "#,
        )
        .bind(escaped_prefix)
        .fetch_all(db)
        .await?;

        Ok(recipes)
    }

    /// Update a recipe's scalar fields
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        name: &str,
        description: &str,
    ) -> Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            UPDATE recipes
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(db)
        .await?;

        Ok(recipe)
    }

    /// Delete a recipe; its ingredients go with it via ON DELETE CASCADE
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Ingredient repository
pub struct IngredientRepository;

impl IngredientRepository {
    /// Create an ingredient owned by the given recipe
    ///
    /// Always inserts a fresh row; identically named ingredients on other
    /// recipes are never looked up or reused.
    pub async fn create(
        db: impl PgExecutor<'_>,
        recipe_id: Uuid,
        name: &str,
    ) -> Result<IngredientRecord> {
        let ingredient = sqlx::query_as::<_, IngredientRecord>(
            r#"
            INSERT INTO ingredients (recipe_id, name)
            VALUES ($1, $2)
            RETURNING id, recipe_id, name, created_at
            "#,
        )
        .bind(recipe_id)
        .bind(name)
        .fetch_one(db)
        .await?;

        Ok(ingredient)
    }

    /// Get ingredients for a recipe
    pub async fn get_by_recipe(
        db: impl PgExecutor<'_>,
        recipe_id: Uuid,
    ) -> Result<Vec<IngredientRecord>> {
        let ingredients = sqlx::query_as::<_, IngredientRecord>(
            r#"
            SELECT id, recipe_id, name, created_at
            FROM ingredients
            WHERE recipe_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(recipe_id)
        .fetch_all(db)
        .await?;

        Ok(ingredients)
    }

    /// Get ingredients for a set of recipes in one query
    pub async fn get_by_recipes(
        db: impl PgExecutor<'_>,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<IngredientRecord>> {
        let ingredients = sqlx::query_as::<_, IngredientRecord>(
            r#"
            SELECT id, recipe_id, name, created_at
            FROM ingredients
            WHERE recipe_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(recipe_ids)
        .fetch_all(db)
        .await?;

        Ok(ingredients)
    }

    /// Delete every ingredient owned by a recipe, returning how many went
    pub async fn delete_by_recipe(db: impl PgExecutor<'_>, recipe_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count ingredient rows with the given name across all recipes
    pub async fn count_by_name(db: impl PgExecutor<'_>, name: &str) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM ingredients WHERE name = $1")
                .bind(name)
                .fetch_one(db)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn records_display_as_their_name() {
        let now = Utc::now();
        let recipe = RecipeRecord {
            id: Uuid::new_v4(),
            name: "Bacon Butty".to_string(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(recipe.to_string(), "Bacon Butty");

        let ingredient = IngredientRecord {
            id: Uuid::new_v4(),
            recipe_id: recipe.id,
            name: "Bacon".to_string(),
            created_at: now,
        };
        assert_eq!(ingredient.to_string(), "Bacon");
    }
}
