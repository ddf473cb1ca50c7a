//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod cuadres;
pub mod health;
pub mod inventory;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(inventory::routes())
        .merge(cuadres::routes())
}
