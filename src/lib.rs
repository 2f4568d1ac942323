//! # Tile Connect Library
//!
//! This library provides the rules engine for a tile-matching puzzle: pairs
//! of equal tiles are removed when they can be joined by a connector of at
//! most three straight segments that passes only through empty cells or the
//! free ring around the board.
//!
//! It is used by two binaries:
//! - `human_player`: Allows interactive play via the command line.
//! - `auto_solver`: Takes a board file and a depth limit, then outputs a
//!   sequence of removals that clears the board, or removes as many pairs as
//!   possible.
//!
//! ## Modules
//! - `engine`: The board (`Board`), tiles (`Tile`) and the play session
//!   (`Game`) with its select / match / resolve cycle.
//! - `generator`: Random paired boards, with an optional fixed value list.
//! - `pathfinder`: The minimum-turn connector search.
//! - `reflow`: How surviving tiles move after a match.
//! - `level`: Level configuration loaded from JSON.
//! - `solver`: Hints, dead-board detection and the `solve_dfs` look-ahead.
//! - `utils`: Parsing boards from text rows.
//! - `error`: The crate `Error` type.

pub mod engine;
pub mod error;
pub mod generator;
pub mod level;
pub mod pathfinder;
pub mod reflow;
pub mod solver;
pub mod utils;

pub use error::{Error, Result};
