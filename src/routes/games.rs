use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Assignment, AssignmentRecord, Game, Player};
use crate::error::AppError;
use crate::routes::roles::RoleResponse;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the game route group: `/games/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_game))
        .route("/{game_id}", get(get_game).delete(delete_game))
        .route("/{game_id}/join", post(join_game))
        .route("/{game_id}/players", get(list_players))
        .route("/{game_id}/players/{player_id}/role", get(get_player_role))
        .route("/{game_id}/lobby", post(open_lobby))
        .route("/{game_id}/start", post(start_game))
        .route("/{game_id}/end", post(end_game))
        .route("/{game_id}/cancel", post(cancel_game))
        .route(
            "/{game_id}/assignments",
            post(draw_assignments).get(list_assignments),
        )
        .route("/{game_id}/reassign", post(reassign_roles))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModeratorRequest {
    moderator_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinGameRequest {
    name: String,
    external_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GameResponse {
    id: String,
    status: String,
    moderator_id: Uuid,
    created_at: String,
    updated_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    id: Uuid,
    game_id: String,
    name: String,
    external_id: String,
    joined_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentResponse {
    player_id: Uuid,
    role: RoleResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    assigned_at: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn build_game_response(game: Game) -> GameResponse {
    GameResponse {
        id: game.id.to_string(),
        status: game.status.as_str().to_string(),
        moderator_id: game.moderator_id,
        created_at: game.created_at.to_rfc3339(),
        updated_at: game.updated_at.to_rfc3339(),
    }
}

fn build_player_response(p: Player) -> PlayerResponse {
    PlayerResponse {
        id: p.id,
        game_id: p.game_id,
        name: p.name,
        external_id: p.external_id,
        joined_at: p.joined_at.to_rfc3339(),
    }
}

fn build_draw_response(assignments: Vec<Assignment>) -> Vec<AssignmentResponse> {
    assignments
        .into_iter()
        .map(|a| AssignmentResponse {
            player_id: a.player_id,
            role: RoleResponse::from(a.role),
            assigned_at: None,
        })
        .collect()
}

fn build_record_response(record: AssignmentRecord) -> AssignmentResponse {
    AssignmentResponse {
        player_id: record.player_id,
        role: RoleResponse::from(record.role),
        assigned_at: Some(record.assigned_at.to_rfc3339()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/games`: Create a game under a fresh join code.
async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<ModeratorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    let Json(body) = payload?;
    let game = state
        .sessions
        .create_game(&state.call_context(), body.moderator_id)
        .await?;
    Ok((StatusCode::CREATED, Json(build_game_response(game))))
}

/// `GET /api/v1/games/{gameId}`
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state
        .sessions
        .get_game(&state.call_context(), &game_id)
        .await?;
    Ok(Json(build_game_response(game)))
}

/// `DELETE /api/v1/games/{gameId}`: Remove the game with its players and roles.
async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .delete_game(&state.call_context(), &game_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/games/{code}/join`: Join a game by its code.
async fn join_game(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<JoinGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlayerResponse>), AppError> {
    let Json(body) = payload?;
    let player = state
        .sessions
        .join_game(&state.call_context(), &code, &body.name, &body.external_id)
        .await?;
    Ok((StatusCode::CREATED, Json(build_player_response(player))))
}

/// `GET /api/v1/games/{gameId}/players`: Players in join order.
async fn list_players(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Vec<PlayerResponse>>, AppError> {
    let players = state
        .sessions
        .list_players(&state.call_context(), &game_id)
        .await?;
    Ok(Json(
        players.into_iter().map(build_player_response).collect(),
    ))
}

/// `GET /api/v1/games/{gameId}/players/{playerId}/role`: One player's secret role.
async fn get_player_role(
    State(state): State<AppState>,
    Path((game_id, player_id)): Path<(String, Uuid)>,
) -> Result<Json<RoleResponse>, AppError> {
    let role = state
        .sessions
        .get_assignment(&state.call_context(), &game_id, player_id)
        .await?;
    Ok(Json(RoleResponse::from(role)))
}

/// `POST /api/v1/games/{gameId}/lobby`
async fn open_lobby(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state
        .sessions
        .open_lobby(&state.call_context(), &game_id)
        .await?;
    Ok(Json(build_game_response(game)))
}

/// `POST /api/v1/games/{gameId}/start`: Deal roles and start the game.
async fn start_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state
        .sessions
        .start_game(&state.call_context(), &game_id)
        .await?;
    Ok(Json(build_game_response(game)))
}

/// `POST /api/v1/games/{gameId}/end`
async fn end_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state
        .sessions
        .end_game(&state.call_context(), &game_id)
        .await?;
    Ok(Json(build_game_response(game)))
}

/// `POST /api/v1/games/{gameId}/cancel`
async fn cancel_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state
        .sessions
        .cancel_game(&state.call_context(), &game_id)
        .await?;
    Ok(Json(build_game_response(game)))
}

/// `POST /api/v1/games/{gameId}/assignments`: Draw a draft while in the lobby.
async fn draw_assignments(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let assignments = state
        .sessions
        .assign_roles(&state.call_context(), &game_id)
        .await?;
    Ok(Json(build_draw_response(assignments)))
}

/// `GET /api/v1/games/{gameId}/assignments?moderatorId=`: Full table, moderator only.
async fn list_assignments(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Query(query): Query<ModeratorRequest>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let records = state
        .sessions
        .list_assignments(&state.call_context(), &game_id, query.moderator_id)
        .await?;
    Ok(Json(
        records.into_iter().map(build_record_response).collect(),
    ))
}

/// `POST /api/v1/games/{gameId}/reassign`: Redeal a running game (moderator only).
async fn reassign_roles(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    payload: Result<Json<ModeratorRequest>, JsonRejection>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let Json(body) = payload?;
    let assignments = state
        .sessions
        .reassign_roles(&state.call_context(), &game_id, body.moderator_id)
        .await?;
    Ok(Json(build_draw_response(assignments)))
}
