//! sea-orm entities backing the host / player / game / registration tables.

pub mod game;
pub mod host;
pub mod player;
pub mod registration;
