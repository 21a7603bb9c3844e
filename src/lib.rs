//! # Deckstore - Card deck statistics and SQLite deck tables
//!
//! Deckstore provides:
//! - A value model for cards and decks with cost statistics and subsetting
//! - One SQLite table per deck, created with replace semantics
//! - Ad-hoc read queries and reconstruction of decks from their results
//! - Pluggable card resolution and deck-list parsing
//! - A small CLI that threads every path and deck explicitly through its commands

pub mod card;
pub mod deck;
pub mod ingest;
pub mod store;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use card::Card;
pub use deck::{CostHistogram, CostPartition, Deck, DeckSummary, TextScope};
pub use ingest::{Catalog, CardResolver, DeckListParser, DeckParser, FileKind, ParsedDeck};
pub use store::{Cell, Loaded, Reconstruction, ResolveFailure, ResultSet, TableStore};

use std::path::PathBuf;

/// Result type alias for Deckstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Deckstore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Average cost undefined: deck '{deck}' has no non-land cards")]
    DivisionUndefined { deck: String },

    #[error("Card not found: {0}")]
    NotFound(String),

    #[error("Table already exists: {0}")]
    SchemaConflict(String),

    #[error("Malformed query '{query}': {source}")]
    QueryMalformed {
        query: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Store target does not exist: {}", .0.display())]
    TargetMissing(PathBuf),

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
