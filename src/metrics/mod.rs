use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod streak;

pub fn router() -> Router<AppState> {
    handlers::metric_routes()
}
