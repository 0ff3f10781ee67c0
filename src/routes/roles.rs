use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::Role;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /roles`
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_roles))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    id: Uuid,
    name: String,
    team: String,
    description: String,
    /// `null` for roles without a cap.
    max_per_game: Option<i32>,
    unique: bool,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            team: role.team.as_str().to_string(),
            max_per_game: role.capacity.to_column(),
            unique: role.capacity.is_unique(),
            name: role.name,
            description: role.description,
        }
    }
}

/// `GET /api/v1/roles`: The role catalog, grouped by team.
async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<RoleResponse>>, AppError> {
    let roles = state.sessions.list_roles(&state.call_context()).await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}
