//! Food Handlers

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use shared::client::{FoodListQuery, ReviewCreate};
use shared::error::{AppError, AppResult};
use shared::models::{FoodCreate, FoodItem, ReviewEntry};
use shared::rating::validate_review;
use shared::sort::sort_foods;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// List foods, newest first unless a sort key is given
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<FoodListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<FoodItem>>> {
    let Query(query) = query.map_err(|e| AppError::invalid(e.body_text()))?;
    let foods = state.store.list_food_items().await?;

    Ok(Json(match query.sort {
        Some(sort) => sort_foods(&foods, sort),
        None => foods,
    }))
}

/// Get one food
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<FoodItem>> {
    Ok(Json(state.store.get_food_item(&id).await?))
}

/// Add a food to the menu
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    payload: Result<Json<FoodCreate>, JsonRejection>,
) -> AppResult<Json<FoodItem>> {
    let Json(payload) = payload?;
    payload.validate()?;
    let food = state.store.add_food_item(payload).await?;

    tracing::info!(food_id = %food.id, name = %food.name, user_id = %user.id, "Food created");
    Ok(Json(food))
}

/// Append a review
///
/// Input is validated before the store is touched; the server trims the
/// comment and assigns the review id and timestamp.
pub async fn add_review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<ReviewCreate>, JsonRejection>,
) -> AppResult<Json<FoodItem>> {
    let Json(payload) = payload?;
    let comment = payload.comment.trim();
    validate_review(payload.rating, comment)?;

    let review = ReviewEntry::new(payload.rating, comment);
    let food = state.store.append_review(&id, review).await?;

    tracing::info!(
        food_id = %food.id,
        user_id = %user.id,
        reviews = food.review_count(),
        rating = ?food.rating,
        "Review added"
    );
    Ok(Json(food))
}
