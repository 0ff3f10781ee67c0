pub mod game_code;
pub mod random;

pub use game_code::{CodeGenerator, GameCode, is_valid_game_code, normalize_game_code};
pub use random::{RandomSource, SequenceSource, SharedRng, shuffle};
