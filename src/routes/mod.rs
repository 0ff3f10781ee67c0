mod games;
mod health;
mod roles;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health`: lightweight health check
/// - `GET /api/v1/health`: detailed health check with database connectivity
/// - `/api/v1/roles`: role catalog
/// - `/api/v1/games/...`: game lifecycle, players and role assignment
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .nest("/roles", roles::router())
        .nest("/games", games::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
