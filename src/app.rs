use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/participants/:id/days/:day", get(handlers::day_page))
        .route("/participants/:id/days/:day/check-in", post(handlers::check_in_form))
        .route("/api/challenge", get(handlers::get_challenge))
        .route("/api/participants/:id", get(handlers::get_participant))
        .route("/api/participants/:id/days/:day", get(handlers::open_day))
        .route("/api/participants/:id/days/:day/check-in", post(handlers::check_in))
        .with_state(state)
}
