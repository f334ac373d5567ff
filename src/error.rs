use std::path::PathBuf;

use bracket_geometry::prelude::Point;

use crate::data::{CharacterClass, RuneId};

/// Failures of board engine operations. None of these leave the board mutated.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("rune {0} is not in the rune catalog")]
    UnknownRune(RuneId),

    #[error("no grid layout is available for class {0}")]
    UnknownClass(CharacterClass),

    #[error("rune {rune} does not fit on the grid at {},{}", .anchor.x, .anchor.y)]
    OutOfBounds { rune: RuneId, anchor: Point },

    #[error("rune {0} is not placed on the board")]
    RuneNotPlaced(RuneId),

    /// The catalog answered the placement check but not the write that followed.
    #[error("rune {0} vanished from the catalog mid-placement")]
    CatalogCorrupted(RuneId),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog entry: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("save store I/O failed for slot '{slot}': {source}")]
    Io {
        slot: String,
        #[source]
        source: std::io::Error,
    },

    #[error("save slot '{slot}' holds malformed data: {source}")]
    Json {
        slot: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("preset index {0} is outside 1..=3")]
    InvalidPreset(u8),

    #[error("no character class is active on the board")]
    NoActiveClass,
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("script line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error for the binary and for callers that mix layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
