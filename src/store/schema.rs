//! Deck table schema
//!
//! Every deck gets its own table, named after the deck. Table names cannot be
//! bound as parameters, so they are validated before being spliced into SQL.

use crate::{Error, Result};

/// Column list in schema order
pub const COLUMNS: &[&str] = &[
    "id",
    "name",
    "count",
    "mana_cost",
    "cmc",
    "color_identity",
    "card_type",
    "text",
    "im_url",
];

/// Column holding the row identity
pub const IDENTITY_COLUMN: &str = "id";

/// A table name that is safe to interpolate into SQL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Accepts `[A-Za-z_][A-Za-z0-9_]*`
    pub fn new(name: &str) -> Result<Self> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid_start && valid_rest {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::InvalidTableName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Quoted so names that collide with SQL keywords still work
        write!(f, "\"{}\"", self.0)
    }
}

/// SQL to create a deck table
pub fn create_table(table: &TableName) -> String {
    format!(
        r#"
CREATE TABLE {table} (
    id INTEGER PRIMARY KEY,
    name TEXT,
    count INTEGER,
    mana_cost TEXT,
    cmc INTEGER,
    color_identity TEXT,
    card_type TEXT,
    text TEXT,
    im_url TEXT
)
"#
    )
}

pub fn drop_table(table: &TableName) -> String {
    format!("DROP TABLE {table}")
}

pub fn insert_card(table: &TableName) -> String {
    format!(
        r#"
INSERT INTO {table} (name, count, mana_cost, cmc, color_identity, card_type, text, im_url)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#
    )
}

pub fn select_name_count(table: &TableName) -> String {
    format!("SELECT id, name, count FROM {table} ORDER BY id")
}

/// Select `(id, name)` for `n` bound ids
pub fn select_names_by_id(table: &TableName, n: usize) -> String {
    let placeholders = (1..=n).map(|i| format!("?{}", i)).collect::<Vec<_>>().join(", ");
    format!("SELECT id, name FROM {table} WHERE id IN ({placeholders}) ORDER BY id")
}

pub fn count_rows(table: &TableName) -> String {
    format!("SELECT COUNT(*) FROM {table}")
}

pub const TABLE_EXISTS: &str = "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";
