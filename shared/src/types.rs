//! API request and response types
//!
//! Requests carry their own validation rules via the `validator` derive;
//! identifiers are output-only and never accepted from callers.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Ingredient entry inside a recipe payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct IngredientPayload {
    // 255 matches the original storage column width for names
    #[validate(length(min = 1, max = 255, message = "ingredient name must not be empty"))]
    pub name: String,
}

/// Request body for creating a recipe
///
/// `ingredients` must be a sequence of name-bearing objects; a scalar value
/// fails JSON deserialization before any validation runs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRecipeRequest {
    #[validate(length(min = 1, max = 255, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<IngredientPayload>,
}

/// Request body for updating a recipe (full or partial)
///
/// Omitted fields keep their stored value. An omitted `ingredients` key
/// leaves the ingredient set untouched; a present one (even `[]`) replaces
/// the whole set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRecipeRequest {
    #[validate(length(min = 1, max = 255, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(nested)]
    pub ingredients: Option<Vec<IngredientPayload>>,
}

/// Query parameters for listing recipes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeListQuery {
    /// Case-sensitive prefix filter on the recipe name
    pub name_prefix: Option<String>,
}

/// Ingredient representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientResponse {
    pub id: String,
    pub name: String,
}

/// Recipe representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<IngredientResponse>,
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn create_request_defaults() {
        let req: CreateRecipeRequest =
            serde_json::from_value(serde_json::json!({"name": "Bacon Butty"})).unwrap();
        assert_eq!(req.name, "Bacon Butty");
        assert_eq!(req.description, "");
        assert!(req.ingredients.is_empty());
    }

    #[test]
    fn create_request_rejects_scalar_ingredients() {
        let result = serde_json::from_value::<CreateRecipeRequest>(serde_json::json!({
            "name": "Soup",
            "ingredients": "ingredient 1",
        }));
        assert!(result.is_err(), "a bare string is not a sequence of objects");
    }

    #[test]
    fn create_request_rejects_missing_name() {
        let result = serde_json::from_value::<CreateRecipeRequest>(
            serde_json::json!({"description": "no name"}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn create_request_ignores_supplied_ids() {
        // Identifiers are output-only; a caller-supplied id is dropped
        let req: CreateRecipeRequest = serde_json::from_value(serde_json::json!({
            "id": "11111111-1111-1111-1111-111111111111",
            "name": "Soup",
            "ingredients": [{"id": "22222222-2222-2222-2222-222222222222", "name": "Water"}],
        }))
        .unwrap();
        assert_eq!(req.ingredients.len(), 1);
        assert_eq!(req.ingredients[0].name, "Water");
    }

    #[rstest]
    #[case("")]
    #[case(&"x".repeat(256))]
    fn create_request_invalid_names(#[case] name: &str) {
        let req = CreateRecipeRequest {
            name: name.to_string(),
            description: String::new(),
            ingredients: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_request_rejects_empty_ingredient_name() {
        let req = CreateRecipeRequest {
            name: "Soup".to_string(),
            description: String::new(),
            ingredients: vec![IngredientPayload { name: String::new() }],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_request_distinguishes_absent_and_empty_ingredients() {
        let absent: UpdateRecipeRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(absent.ingredients.is_none());

        let empty: UpdateRecipeRequest =
            serde_json::from_value(serde_json::json!({"ingredients": []})).unwrap();
        assert_eq!(empty.ingredients, Some(vec![]));
    }

    #[test]
    fn update_request_validates_present_fields_only() {
        let req = UpdateRecipeRequest::default();
        assert!(req.validate().is_ok());

        let req = UpdateRecipeRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
