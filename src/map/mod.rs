//! This module defines the level grid and provides functions for querying it.

pub mod builder;
pub mod direction;
pub mod mechanism;
pub mod parser;
pub mod sight;
