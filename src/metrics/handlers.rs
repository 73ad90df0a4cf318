use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    auth::AuthUser,
    error::ApiError,
    metrics::{
        dto::{BestSequencyResponse, DietCountResponse, DietQuery, MealCountResponse},
        streak::best_streak,
    },
    state::AppState,
};

pub fn metric_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics/count", get(count_meals))
        .route("/metrics/count/by-diet", get(count_by_diet))
        .route("/metrics/count/best-sequency", get(best_sequency))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn count_meals(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MealCountResponse>, ApiError> {
    let meals_quantity = state.meals.count(user.id, None).await?;
    Ok(Json(MealCountResponse { meals_quantity }))
}

#[instrument(skip(state, user, query), fields(user_id = %user.id))]
pub async fn count_by_diet(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<DietQuery>, QueryRejection>,
) -> Result<Json<DietCountResponse>, ApiError> {
    let Query(query) = query?;
    let in_diet = query
        .flag()
        .ok_or_else(|| ApiError::invalid("inDiet", "must be \"true\" or \"false\""))?;

    let count_meals = state.meals.count(user.id, Some(in_diet)).await?;
    Ok(Json(DietCountResponse {
        count_meals,
        in_diet,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn best_sequency(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<BestSequencyResponse>, ApiError> {
    let timeline = state.meals.timeline(user.id).await?;
    let best = best_streak(&timeline);
    debug!(meals = timeline.len(), best, "best streak computed");
    Ok(Json(BestSequencyResponse {
        best_sequency: best,
    }))
}
