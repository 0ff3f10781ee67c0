//! Persistence contract for games, players, roles and assignments.
//!
//! The session core talks to storage only through [`Repository`]. Every method
//! is atomic on its own; methods that touch several rows run in one
//! transaction. [`SeaRepository`] implements the contract over `SeaORM`.

mod context;
mod sea;

pub use context::CallContext;
pub use sea::SeaRepository;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::domain::{
    Assignment, AssignmentRecord, Game, GameError, GameStatus, NewGame, NewPlayer, NewRole,
    Player, Role,
};
use crate::utils::GameCode;

/// Result of a guarded player insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInsert {
    /// Row inserted. `promoted` is set when this join moved the game Created -> Lobby.
    Joined { player: Player, promoted: bool },
    /// The game was missing or no longer joinable when the guard ran.
    NotJoinable,
}

/// A full replacement of a game's assignment set.
#[derive(Debug, Clone)]
pub struct AssignmentCommit {
    pub game_id: GameCode,
    /// Status the game must still have when the transaction runs.
    pub expected: GameStatus,
    /// Status to swap to in the same transaction, if any.
    pub next: Option<GameStatus>,
    /// Player ids the draw was computed from; the commit aborts if the roster differs.
    pub roster: Vec<Uuid>,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// `assigned_at` is also the game's new `updated_at`.
    Committed { assigned_at: DateTime<FixedOffset> },
    /// The status guard failed; nothing was written.
    StatusChanged,
    /// Players joined or left after the draw; nothing was written.
    RosterChanged,
}

#[async_trait]
pub trait Repository: Send + Sync {
    /// Whether a game with this code exists.
    async fn code_exists(&self, code: &GameCode) -> Result<bool, GameError>;

    /// Insert a game in status `Created`. Returns `None` when the code is already
    /// taken, including when a concurrent insert won the race.
    async fn insert_game(&self, game: NewGame) -> Result<Option<Game>, GameError>;

    async fn find_game(&self, id: &GameCode) -> Result<Option<Game>, GameError>;

    /// Compare-and-swap on status. Returns the game as committed, or `None` if
    /// it is not in `from`.
    async fn transition_status(
        &self,
        id: &GameCode,
        from: GameStatus,
        to: GameStatus,
    ) -> Result<Option<Game>, GameError>;

    /// Insert a player while the game is joinable, promoting Created -> Lobby on
    /// the first join, all in one transaction.
    async fn add_player(&self, id: &GameCode, player: NewPlayer)
    -> Result<PlayerInsert, GameError>;

    /// Players of a game in join order.
    async fn list_players(&self, id: &GameCode) -> Result<Vec<Player>, GameError>;

    async fn list_roles(&self) -> Result<Vec<Role>, GameError>;

    async fn insert_role(&self, role: NewRole) -> Result<Role, GameError>;

    /// Returns `false` if no such role exists.
    async fn delete_role(&self, id: Uuid) -> Result<bool, GameError>;

    /// Replace every `game_role` row of a game in one transaction.
    async fn replace_assignments(
        &self,
        commit: AssignmentCommit,
    ) -> Result<CommitOutcome, GameError>;

    async fn find_assignment(
        &self,
        id: &GameCode,
        player_id: Uuid,
    ) -> Result<Option<Role>, GameError>;

    async fn list_assignments(&self, id: &GameCode)
    -> Result<Vec<AssignmentRecord>, GameError>;

    /// Delete a game and every player and assignment that references it.
    /// Returns `false` if the game did not exist.
    async fn delete_game(&self, id: &GameCode) -> Result<bool, GameError>;
}
