//! Tile maze game library crate.
//!
//! Loads ASCII levels and simulates them one tick at a time: player movement,
//! enemy AI, spikes, keys, mechanisms and the end-of-level checks.

pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod logging;
pub mod map;
pub mod systems;
pub mod texture;
