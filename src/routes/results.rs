use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::app::AppState;
use crate::routes::render;
use crate::views::ResultsPage;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/results", get(show_results))
}

async fn show_results(State(state): State<Arc<AppState>>) -> Response {
    render(StatusCode::OK, ResultsPage::from_stores(&state.stores))
}
