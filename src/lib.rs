//! LFG API - registration backend for hosted game sessions
//!
//! This crate provides the REST API that lets:
//! - Hosts register, schedule games on a platform, and manage the games they own
//! - Players register, browse upcoming games, and claim or give up seats
//!
//! Seat counts are kept consistent with registrations: a game never holds more players
//! than `max_players`, and a player holds at most one seat per game.

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod error;
pub mod extract;
pub mod routes;
pub mod services;
pub mod state;
