//! Domain error type for the session core.
//!
//! `GameError` is HTTP-agnostic. Handlers convert it into
//! [`AppError`](crate::error::AppError) via the `From` impl there; the
//! coarse [`ErrorKind`] decides the status code.

use thiserror::Error;

use crate::domain::status::GameStatus;
use crate::domain::team::Team;

/// Error taxonomy shared by every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,
    /// Missing game, player, role or assignment.
    NotFound,
    /// Duplicate code, lost race, already started.
    Conflict,
    /// Illegal transition, not enough players or roles.
    State,
    /// Code generation retries exhausted.
    Exhaustion,
    /// Caller deadline exceeded or call cancelled.
    Timeout,
    /// Caller is not the moderator of the game.
    Forbidden,
    /// Unexpected collaborator failure.
    Internal,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("game {0} not found")]
    GameNotFound(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("game {code} is {status} and cannot be joined")]
    GameNotJoinable { code: String, status: GameStatus },

    #[error("cannot move game from {current} to {requested}")]
    InvalidStateTransition {
        current: GameStatus,
        requested: GameStatus,
    },

    #[error("cannot {action} while the game is {current}")]
    InvalidState {
        current: GameStatus,
        action: &'static str,
    },

    #[error("at least {required} players are required, found {actual}")]
    InsufficientPlayers { required: usize, actual: usize },

    #[error("no roles are configured")]
    NoRolesConfigured,

    #[error("role catalog can seat {available} of {required} players")]
    InsufficientRoles { required: usize, available: usize },

    #[error("team {team} needs {required} roles but the catalog allows {available}")]
    InsufficientTeamRoles {
        team: Team,
        required: usize,
        available: usize,
    },

    #[error("game {0} has already started")]
    GameAlreadyStarted(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("only the moderator may {0}")]
    Forbidden(&'static str),

    #[error("no unused game code found after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    #[error("{0} timed out")]
    Timeout(&'static str),

    #[error("{0} was cancelled")]
    Cancelled(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl GameError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict(detail.into())
    }

    /// Coarse category used for HTTP mapping and logging.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::GameNotFound(_) | Self::NotFound(_) => ErrorKind::NotFound,
            Self::GameNotJoinable { .. } | Self::GameAlreadyStarted(_) | Self::Conflict(_) => {
                ErrorKind::Conflict
            }
            Self::InvalidStateTransition { .. }
            | Self::InvalidState { .. }
            | Self::InsufficientPlayers { .. }
            | Self::NoRolesConfigured
            | Self::InsufficientRoles { .. }
            | Self::InsufficientTeamRoles { .. } => ErrorKind::State,
            Self::CodeSpaceExhausted { .. } => ErrorKind::Exhaustion,
            Self::Timeout(_) | Self::Cancelled(_) => ErrorKind::Timeout,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code for API clients.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::GameNotFound(_) => "GAME_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::GameNotJoinable { .. } => "GAME_NOT_JOINABLE",
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::InsufficientPlayers { .. } => "INSUFFICIENT_PLAYERS",
            Self::NoRolesConfigured => "NO_ROLES_CONFIGURED",
            Self::InsufficientRoles { .. } | Self::InsufficientTeamRoles { .. } => {
                "INSUFFICIENT_ROLES"
            }
            Self::GameAlreadyStarted(_) => "GAME_ALREADY_STARTED",
            Self::Conflict(_) => "CONFLICT",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::CodeSpaceExhausted { .. } => "CODE_SPACE_EXHAUSTED",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cancelled(_) => "CANCELLED",
            Self::Database(_) => "INTERNAL_ERROR",
        }
    }
}
