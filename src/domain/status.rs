use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::GameError;

/// Game lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Game exists, nobody has joined yet
    Created,
    /// Players are gathering
    Lobby,
    /// Roles are dealt and locked
    InProgress,
    /// Moderator ended the game (terminal)
    Completed,
    /// Moderator cancelled the game (terminal)
    Cancelled,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl GameStatus {
    pub const ALL: [Self; 5] = [
        Self::Created,
        Self::Lobby,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Statuses that still accept new players.
    pub const JOINABLE: [Self; 2] = [Self::Created, Self::Lobby];

    /// Parse the database / wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for anything outside the closed set.
    pub fn parse(s: &str) -> Result<Self, GameError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "lobby" => Ok(Self::Lobby),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(GameError::validation(format!(
                "unknown game status '{other}'"
            ))),
        }
    }

    /// Convert to database string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Lobby => "lobby",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Check if players can join
    pub const fn can_join(&self) -> bool {
        matches!(self, Self::Created | Self::Lobby)
    }

    /// Terminal statuses have no outgoing transitions.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// The legal lifecycle edges of a game.
///
/// ```text
/// Created ──► Lobby ──► InProgress ──► Completed
///    │          │           │
///    └──────────┴───────────┴────────► Cancelled
/// ```
pub struct GameStateMachine;

impl GameStateMachine {
    /// Whether `from -> to` is an edge of the lifecycle graph.
    pub const fn is_legal(from: GameStatus, to: GameStatus) -> bool {
        matches!(
            (from, to),
            (GameStatus::Created, GameStatus::Lobby)
                | (GameStatus::Lobby, GameStatus::InProgress)
                | (GameStatus::InProgress, GameStatus::Completed)
                | (
                    GameStatus::Created | GameStatus::Lobby | GameStatus::InProgress,
                    GameStatus::Cancelled
                )
        )
    }

    /// Validate a requested transition, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidStateTransition`] for any edge not in the graph,
    /// including every edge out of a terminal status.
    pub fn transition(from: GameStatus, to: GameStatus) -> Result<GameStatus, GameError> {
        if Self::is_legal(from, to) {
            Ok(to)
        } else {
            Err(GameError::InvalidStateTransition {
                current: from,
                requested: to,
            })
        }
    }
}
