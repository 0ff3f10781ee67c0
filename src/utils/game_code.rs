use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::GameError;
use crate::utils::random::RandomSource;

/// Characters allowed in game codes (uppercase alphanumeric).
pub const GAME_CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const GAME_CODE_LENGTH: usize = 6;

/// A validated 6-character join code. Also the primary key of a game.
///
/// Human-readable join token only; never treat it as a credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GameCode(String);

impl GameCode {
    /// Normalize and validate user input.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] unless the normalized input matches `[A-Z0-9]{6}`.
    pub fn parse(input: &str) -> Result<Self, GameError> {
        let normalized = normalize_game_code(input);
        if is_valid_game_code(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(GameError::validation(format!(
                "game code must be {GAME_CODE_LENGTH} letters or digits"
            )))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GameCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Produces candidate codes; uniqueness is enforced by the caller.
#[derive(Clone)]
pub struct CodeGenerator {
    source: Arc<dyn RandomSource>,
}

impl CodeGenerator {
    pub fn new(source: Arc<dyn RandomSource>) -> Self {
        Self { source }
    }

    /// One independent uniform draw from the 36-symbol alphabet per character.
    #[must_use]
    pub fn generate(&self) -> GameCode {
        let code = (0..GAME_CODE_LENGTH)
            .map(|_| char::from(GAME_CODE_CHARS[self.source.next_index(GAME_CODE_CHARS.len())]))
            .collect();
        GameCode(code)
    }
}

/// Validate game code format (expects already-normalized input)
pub fn is_valid_game_code(code: &str) -> bool {
    code.len() == GAME_CODE_LENGTH && code.bytes().all(|c| GAME_CODE_CHARS.contains(&c))
}

/// Normalize game code (uppercase, trimmed)
pub fn normalize_game_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
