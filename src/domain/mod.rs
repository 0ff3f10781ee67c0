//! Game-night domain: lifecycle, teams, role assignment and errors.
//!
//! Nothing here reads entity models; the repository converts them into these
//! types at the boundary, and database failures arrive as [`GameError::Database`].

pub mod assignment;
pub mod error;
pub mod models;
pub mod status;
pub mod team;

pub use assignment::{BalanceRules, RoleAssignmentEngine};
pub use error::{ErrorKind, GameError};
pub use models::{
    Assignment, AssignmentRecord, Game, NewGame, NewPlayer, NewRole, Player, Role,
};
pub use status::{GameStateMachine, GameStatus};
pub use team::{RoleCapacity, Team};
