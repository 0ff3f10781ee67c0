use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::GameError;

/// Faction used for balance computation. The set is closed.
///
/// Declaration order doubles as the tie-break order when two teams carry the
/// same ratio weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Town,
    Mafia,
    Neutral,
}

impl Team {
    pub const ALL: [Self; 3] = [Self::Town, Self::Mafia, Self::Neutral];

    /// Parse the database / config representation.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for an unknown team name.
    pub fn parse(s: &str) -> Result<Self, GameError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "town" => Ok(Self::Town),
            "mafia" => Ok(Self::Mafia),
            "neutral" => Ok(Self::Neutral),
            other => Err(GameError::validation(format!("unknown team '{other}'"))),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Town => "town",
            Self::Mafia => "mafia",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// How many copies of a role a single game may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCapacity {
    /// At most one per game (`max_per_game = 1`).
    Unique,
    /// Pool role capped at `n > 1` copies.
    Limited(usize),
    /// Pool role with no cap (`max_per_game IS NULL`).
    Unlimited,
}

impl RoleCapacity {
    /// Decode the nullable `max_per_game` column.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] when the stored cap is below one.
    pub fn from_column(max_per_game: Option<i32>) -> Result<Self, GameError> {
        match max_per_game {
            None => Ok(Self::Unlimited),
            Some(1) => Ok(Self::Unique),
            Some(n) if n > 1 => usize::try_from(n)
                .map(Self::Limited)
                .map_err(|_| GameError::validation(format!("max_per_game {n} is out of range"))),
            Some(n) => Err(GameError::validation(format!(
                "max_per_game must be at least 1, got {n}"
            ))),
        }
    }

    /// Encode for the `max_per_game` column.
    pub fn to_column(self) -> Option<i32> {
        match self {
            Self::Unique => Some(1),
            Self::Limited(n) => Some(i32::try_from(n).unwrap_or(i32::MAX)),
            Self::Unlimited => None,
        }
    }

    pub const fn is_unique(self) -> bool {
        matches!(self, Self::Unique)
    }

    /// Upper bound on copies per game; `None` means unlimited.
    pub const fn max_slots(self) -> Option<usize> {
        match self {
            Self::Unique => Some(1),
            Self::Limited(n) => Some(n),
            Self::Unlimited => None,
        }
    }

    /// Copies this role can contribute towards filling `needed` seats.
    pub fn slots(self, needed: usize) -> usize {
        self.max_slots().map_or(needed, |cap| cap.min(needed))
    }
}
