//! Application services sitting between the HTTP routes and the repository.

pub mod locks;
pub mod session_service;

pub use locks::{GameLockGuard, GameLocks};
pub use session_service::{DEFAULT_CODE_ATTEMPTS, SessionService, validate_player_name};
