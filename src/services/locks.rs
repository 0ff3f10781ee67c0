//! Per-game mutual exclusion inside one process.
//!
//! Mutating operations on the same game take the game's lock so that a draw,
//! its commit and the following status change are not interleaved with another
//! writer in this process. The status compare-and-swap in the repository still
//! guards against writers in other processes.
//!
//! Entries live only while someone holds or waits for them: releasing the last
//! guard of a game removes its entry, so codes that never resolve to a game and
//! games that reached a terminal status leave nothing behind.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::utils::GameCode;

type LockMap = DashMap<GameCode, Arc<Mutex<()>>>;

#[derive(Debug, Clone, Default)]
pub struct GameLocks {
    /// `game_id` → lock guarding writes to that game
    locks: Arc<LockMap>,
}

/// Exclusive access to one game, released on drop.
#[derive(Debug)]
pub struct GameLockGuard {
    game_id: GameCode,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
}

impl GameLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `game_id`.
    pub async fn acquire(&self, game_id: &GameCode) -> GameLockGuard {
        let lock = self
            .locks
            .entry(game_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        GameLockGuard {
            game_id: game_id.clone(),
            guard: Some(lock.lock_owned().await),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Games with a live entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for GameLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // The map's own handle is the last one: nobody holds or waits for this lock.
        // `entry` clones under the same shard lock, so the count cannot rise meanwhile.
        self.locks
            .remove_if(&self.game_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
