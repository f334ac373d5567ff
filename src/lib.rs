//! Rune placement board: class grid layouts, polyomino runes, connectivity
//! bonuses from the special cell, and per-class saved presets.

pub mod board;
pub mod config;
pub mod data;
pub mod error;
pub mod script;
pub mod session;

pub use board::{ArcaneBoard, BoardStats, PlacedRune, PlacementCheck, PlacementResult};
pub use config::BoardConfig;
pub use data::{CharacterClass, RuneId, StatKind};
pub use error::{Error, Result};
pub use session::BoardSession;
