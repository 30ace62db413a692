//! Recipe CRUD API routes
//!
//! Request bodies are deserialized with an explicit `JsonRejection` so a
//! malformed payload (e.g. `ingredients` as a bare string instead of a
//! sequence of objects) surfaces through the standard validation-error
//! envelope before any database work happens.

use crate::error::ApiError;
use crate::services::recipes::{
    CreateRecipeInput, RecipeService, RecipeWithIngredients, UpdateRecipeInput,
};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use recipe_api_shared::types::{
    CreateRecipeRequest, IngredientResponse, RecipeListQuery, RecipeResponse, UpdateRecipeRequest,
};
use uuid::Uuid;
use validator::Validate;

/// Create recipe routes
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route(
            "/:id",
            get(get_recipe)
                .put(replace_recipe)
                .patch(merge_recipe)
                .delete(delete_recipe),
        )
}

fn to_response(result: RecipeWithIngredients) -> RecipeResponse {
    RecipeResponse {
        id: result.recipe.id.to_string(),
        name: result.recipe.name,
        description: result.recipe.description,
        ingredients: result
            .ingredients
            .into_iter()
            .map(|i| IngredientResponse {
                id: i.id.to_string(),
                name: i.name,
            })
            .collect(),
    }
}

/// GET /api/v1/recipes - List recipes
///
/// Ordered by descending name; `?name_prefix=` filters to recipes whose
/// name starts with the given string (case-sensitive).
async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let recipes = RecipeService::list(state.db(), query.name_prefix.as_deref()).await?;

    Ok(Json(recipes.into_iter().map(to_response).collect()))
}

/// POST /api/v1/recipes - Create a recipe with its ingredient entries
async fn create_recipe(
    State(state): State<AppState>,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let input = CreateRecipeInput {
        name: req.name,
        description: req.description,
        ingredients: req.ingredients.into_iter().map(|i| i.name).collect(),
    };

    let created = RecipeService::create(state.db(), input).await?;

    Ok((StatusCode::CREATED, Json(to_response(created))))
}

/// GET /api/v1/recipes/{id} - Fetch a single recipe
async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let recipe = RecipeService::get(state.db(), id).await?;

    Ok(Json(to_response(recipe)))
}

/// PUT /api/v1/recipes/{id} - Full update
///
/// Requires `name`; other fields follow the shared update semantics (an
/// absent `ingredients` key leaves the set untouched).
async fn replace_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    if req.name.is_none() {
        return Err(ApiError::Validation("name is required".to_string()));
    }

    apply_update(&state, id, req).await
}

/// PATCH /api/v1/recipes/{id} - Partial update
async fn merge_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    apply_update(&state, id, req).await
}

async fn apply_update(
    state: &AppState,
    id: Uuid,
    req: UpdateRecipeRequest,
) -> Result<Json<RecipeResponse>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let input = UpdateRecipeInput {
        name: req.name,
        description: req.description,
        ingredients: req
            .ingredients
            .map(|entries| entries.into_iter().map(|i| i.name).collect()),
    };

    let updated = RecipeService::update(state.db(), id, input).await?;

    Ok(Json(to_response(updated)))
}

/// DELETE /api/v1/recipes/{id} - Delete a recipe and its ingredients
async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    RecipeService::delete(state.db(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}
