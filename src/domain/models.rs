//! Games, players and roles as the session core sees them.
//!
//! Status, team and capacity are typed; the repository parses the stored
//! columns when it builds these values.

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::domain::status::GameStatus;
use crate::domain::team::{RoleCapacity, Team};
use crate::utils::GameCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: GameCode,
    pub status: GameStatus,
    pub moderator_id: Uuid,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: Uuid,
    pub game_id: String,
    pub name: String,
    pub external_id: String,
    pub joined_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub team: Team,
    pub description: String,
    pub capacity: RoleCapacity,
}

/// Input for a new game row.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub id: GameCode,
    pub moderator_id: Uuid,
}

/// Input for a new player row; fields are already validated.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub name: String,
    pub external_id: String,
}

/// Input for a new catalog role.
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub team: Team,
    pub description: String,
    pub capacity: RoleCapacity,
}

/// One drawn pairing of a player with a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub player_id: Uuid,
    pub role: Role,
}

/// A persisted pairing, as read back from `game_role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    pub player_id: Uuid,
    pub role: Role,
    pub assigned_at: DateTime<FixedOffset>,
}
