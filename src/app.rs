use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/links", post(handlers::create_link))
        .route("/edit/start", post(handlers::start_edit))
        .route("/edit/save", post(handlers::save_edit))
        .route("/edit/cancel", post(handlers::cancel_edit))
        .route("/api/links", get(handlers::get_links))
        .route("/api/chart", get(handlers::get_chart))
        .route("/api/console", get(handlers::get_console))
        .route("/health", get(handlers::health))
        .with_state(state)
}
