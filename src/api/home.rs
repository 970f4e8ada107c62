//! Root endpoint

use axum::extract::State;

/// Greeting configured under `catalog.greeting`
pub async fn greeting(State(state): State<crate::AppState>) -> String {
    state.config.catalog.greeting.clone()
}
