pub mod game;
pub mod game_role;
pub mod player;
pub mod role;
