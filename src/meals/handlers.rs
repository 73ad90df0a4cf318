use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    meals::{
        dto::{CreateMealRequest, MealResponse, MealView, UpdateMealRequest, UserMealsResponse},
        repo_types::{Meal, MealChanges, NewMeal},
    },
    state::AppState,
    validation::Issues,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/user", get(user_meals))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

/// Loads a meal and checks the caller owns it.
async fn owned_meal(
    state: &AppState,
    user_id: Uuid,
    meal_id: Uuid,
    denied: &str,
) -> Result<Meal, ApiError> {
    let Some(meal) = state.meals.find_by_id(meal_id).await? else {
        return Err(ApiError::NotFound("Meal not found".into()));
    };
    if meal.user_id != user_id {
        warn!(%user_id, %meal_id, owner = %meal.user_id, "meal ownership mismatch");
        return Err(ApiError::Forbidden(denied.into()));
    }
    Ok(meal)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<MealView>>, ApiError> {
    let meals = state.meals.list_by_owner(user.id).await?;
    Ok(Json(meals.into_iter().map(MealView::from).collect()))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn user_meals(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserMealsResponse>, ApiError> {
    let meals = state.meals.list_by_owner(user.id).await?;
    Ok(Json(UserMealsResponse {
        user_meals: meals.into_iter().map(MealView::from).collect(),
    }))
}

#[instrument(skip(state, user, id), fields(user_id = %user.id))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MealResponse>, ApiError> {
    let Path(meal_id) = id?;
    let meal = owned_meal(&state, user.id, meal_id, "You can not access another user meals")
        .await?;
    Ok(Json(MealResponse { meal: meal.into() }))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateMealRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;

    let mut issues = Issues::new();
    issues.non_empty("name", &payload.name);
    issues.non_empty("description", &payload.description);
    let eaten_at = issues.date("date", &payload.date);
    issues.finish()?;
    let Some(eaten_at) = eaten_at else {
        return Err(ApiError::invalid("date", "must be an ISO-8601 date"));
    };

    let meal = state
        .meals
        .insert(NewMeal {
            user_id: user.id,
            name: payload.name.trim().to_string(),
            description: payload.description.trim().to_string(),
            eaten_at,
            in_diet: payload.in_diet,
        })
        .await?;

    info!(meal_id = %meal.id, in_diet = meal.in_diet, "meal created");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user, id, payload), fields(user_id = %user.id))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateMealRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(meal_id) = id?;
    let Json(payload) = payload?;

    let mut issues = Issues::new();
    if let Some(name) = &payload.name {
        issues.non_empty("name", name);
    }
    if let Some(description) = &payload.description {
        issues.non_empty("description", description);
    }
    let eaten_at = payload.date.as_deref().and_then(|d| issues.date("date", d));
    issues.finish()?;

    let meal = owned_meal(&state, user.id, meal_id, "You can not update another user meal")
        .await?;

    let changes = MealChanges {
        name: payload.name.map(|s| s.trim().to_string()),
        description: payload.description.map(|s| s.trim().to_string()),
        eaten_at,
        in_diet: payload.in_diet,
    };
    state.meals.update(meal.id, changes).await?;

    info!(meal_id = %meal.id, "meal updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user, id), fields(user_id = %user.id))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(meal_id) = id?;
    let meal = owned_meal(&state, user.id, meal_id, "You can not delete another user meals")
        .await?;

    match state.meals.delete(meal.id).await {
        Ok(true) => {
            info!(meal_id = %meal.id, "meal deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(ApiError::NotFound("Meal not found".into())),
        Err(e) => Err(ApiError::failed("Error to delete meal", e)),
    }
}
