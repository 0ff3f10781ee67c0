//! Game-night API - session and role-assignment backend for in-person
//! social-deduction games.
//!
//! A moderator creates a game, players join with a six-character code, and
//! at start every player is secretly dealt a role from the catalog according
//! to the configured team balance.

pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
