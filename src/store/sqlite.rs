//! SQLite deck tables
//!
//! A store target is one SQLite file holding one table; the table is named
//! after the file stem, which is the deck name.

use std::path::{Path, PathBuf};
use rusqlite::{params, params_from_iter, Connection};
use crate::card::Card;
use crate::deck::Deck;
use crate::ingest::{resolve_entries, CardResolver, ResolveFailure};
use crate::{Error, Result};
use super::result::{Cell, ResultSet};
use super::schema::{self, TableName};

/// SQLite caps bound parameters per statement; id lookups are batched below it.
const ID_BATCH: usize = 500;

/// File extension of store targets
pub const STORE_EXTENSION: &str = "db";

/// Handle on one deck table
pub struct TableStore {
    conn: Connection,
    table: TableName,
    path: Option<PathBuf>,
}

/// A deck rebuilt from the store, plus the names that could not be resolved
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub deck: Deck,
    pub failures: Vec<ResolveFailure>,
}

impl Reconstruction {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Path of the store target for `deck_name` inside `dir`
pub fn target_path(dir: &Path, deck_name: &str) -> PathBuf {
    dir.join(format!("{}.{}", deck_name, STORE_EXTENSION))
}

/// Write `deck` to its own table in `<target_dir>/<deck.name>.db`.
///
/// Any existing table of that name is dropped first, so the table ends up
/// holding exactly the deck's cards. Rows are committed one at a time; if an
/// insert fails the rows before it stay in the table.
pub fn materialize(deck: &Deck, target_dir: &Path) -> Result<TableStore> {
    TableName::new(&deck.name)?;
    let store = TableStore::create(&target_path(target_dir, &deck.name))?;
    store.write_deck(deck)?;
    Ok(store)
}

impl TableStore {
    /// Open an existing store target.
    ///
    /// Fails with `Error::TargetMissing` when the file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::TargetMissing(path.to_path_buf()));
        }
        let table = Self::table_for(path)?;
        let conn = Connection::open(path)?;
        Ok(Self { conn, table, path: Some(path.to_path_buf()) })
    }

    /// Open a store target, creating the file (and its directory) when missing
    pub fn create(path: &Path) -> Result<Self> {
        let table = Self::table_for(path)?;
        if !path.exists() {
            tracing::info!("{}; creating it", Error::TargetMissing(path.to_path_buf()));
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn, table, path: Some(path.to_path_buf()) })
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory(table: &str) -> Result<Self> {
        let table = TableName::new(table)?;
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, table, path: None })
    }

    /// Table name implied by a store path: its file stem
    pub fn table_for(path: &Path) -> Result<TableName> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        TableName::new(&stem)
    }

    pub fn table(&self) -> &str {
        self.table.as_str()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ========== Table Operations ==========

    pub fn table_exists(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(schema::TABLE_EXISTS, [self.table.as_str()], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Create the deck table; `Error::SchemaConflict` if it already exists
    fn create_table(&self) -> Result<()> {
        if self.table_exists()? {
            return Err(Error::SchemaConflict(self.table.as_str().to_string()));
        }
        self.conn.execute(&schema::create_table(&self.table), [])?;
        Ok(())
    }

    /// Create the deck table, dropping any existing table of the same name.
    ///
    /// This destroys whatever the old table held.
    pub fn replace_table(&self) -> Result<()> {
        match self.create_table() {
            Err(Error::SchemaConflict(table)) => {
                tracing::warn!("Table '{}' already exists; dropping and recreating it", table);
                self.drop_table()?;
                self.create_table()
            }
            other => other,
        }
    }

    pub fn drop_table(&self) -> Result<()> {
        self.conn.execute(&schema::drop_table(&self.table), [])?;
        Ok(())
    }

    /// Insert one card row. Runs in autocommit mode, so it is its own transaction.
    pub fn insert_card(&self, card: &Card) -> Result<()> {
        self.conn.execute(
            &schema::insert_card(&self.table),
            params![
                card.name,
                card.count,
                card.mana_cost,
                card.cmc,
                card.color_identity_text(),
                card.card_type_text(),
                card.text,
                card.image_locator,
            ],
        )?;
        Ok(())
    }

    /// Insert cards in order, stopping at the first failure.
    ///
    /// Each row commits on its own, so the rows inserted before a failure stay.
    pub fn insert_cards(&self, cards: &[Card]) -> Result<usize> {
        for card in cards {
            self.insert_card(card)?;
            tracing::debug!("Inserted {} into {}", card, self.table.as_str());
        }
        Ok(cards.len())
    }

    /// Replace the table contents with the cards of `deck`, one row per card
    pub fn write_deck(&self, deck: &Deck) -> Result<usize> {
        self.replace_table()?;
        let written = self.insert_cards(&deck.cards)?;
        tracing::info!("Materialized {} cards into table '{}'", written, self.table.as_str());
        Ok(written)
    }

    pub fn row_count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(&schema::count_rows(&self.table), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Queries ==========

    /// Run caller-supplied SQL verbatim and collect every row.
    ///
    /// SQLite's own rejection of the text is reported as `Error::QueryMalformed`.
    pub fn run_query(&self, query: &str) -> Result<ResultSet> {
        let malformed = |source: rusqlite::Error| Error::QueryMalformed {
            query: query.to_string(),
            source,
        };

        let mut stmt = self.conn.prepare(query).map_err(malformed)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt.query([]).map_err(malformed)?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(malformed)? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(Cell::from(row.get_ref(i)?));
            }
            collected.push(cells);
        }

        tracing::debug!("Query returned {} rows", collected.len());
        Ok(ResultSet::new(columns, collected))
    }

    // ========== Reconstruction ==========

    /// Rebuild a deck from a query result.
    ///
    /// With an `id` column, the names of those rows are re-read from the table
    /// and resolved afresh with a count of 1; the stored counts are ignored.
    /// Without one, this falls back to `reload_deck`, which keeps stored counts.
    pub fn reconstruct<R>(&self, result: &ResultSet, resolver: &R) -> Result<Reconstruction>
    where
        R: CardResolver + ?Sized,
    {
        let Some(keys) = result.identity_keys() else {
            tracing::debug!("No identity column in result; reloading whole table");
            return self.reload_deck(resolver);
        };

        let deck_name = format!("{}_query", self.table.as_str());
        if keys.is_empty() {
            return Ok(Reconstruction { deck: Deck::empty(deck_name), failures: Vec::new() });
        }

        let (names, nameless) = self.names_for_ids(&keys)?;
        let (deck, mut failures) = resolve_entries(resolver, &deck_name, names.into_iter().map(|n| (n, 1)));
        failures.extend(nameless);
        tracing::info!("Reconstructed {} of {} queried cards", deck.unique_count(), keys.len());
        Ok(Reconstruction { deck, failures })
    }

    /// Rebuild the whole deck from stored `(name, count)` pairs
    pub fn reload_deck<R>(&self, resolver: &R) -> Result<Reconstruction>
    where
        R: CardResolver + ?Sized,
    {
        let mut stmt = self.conn.prepare(&schema::select_name_count(&self.table))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut entries = Vec::with_capacity(rows.len());
        let mut invalid = Vec::new();
        for (id, name, count) in rows {
            let Some(name) = name else {
                invalid.push(self.nameless_row(id));
                continue;
            };
            match count.and_then(|c| u32::try_from(c).ok()).filter(|c| *c > 0) {
                Some(count) => entries.push((name, count)),
                None => invalid.push(ResolveFailure {
                    name,
                    count: 0,
                    reason: format!("invalid stored count {:?}", count),
                }),
            }
        }

        let (deck, mut failures) = resolve_entries(resolver, self.table.as_str(), entries);
        failures.extend(invalid);
        tracing::info!("Reloaded {} cards from table '{}'", deck.unique_count(), self.table.as_str());
        Ok(Reconstruction { deck, failures })
    }

    /// Names for the given ids, in ascending id order, plus a failure for
    /// every matching row that has no name
    fn names_for_ids(&self, keys: &[i64]) -> Result<(Vec<String>, Vec<ResolveFailure>)> {
        let mut keys = keys.to_vec();
        keys.sort_unstable();

        let mut names = Vec::with_capacity(keys.len());
        let mut nameless = Vec::new();
        for batch in keys.chunks(ID_BATCH) {
            let mut stmt = self.conn.prepare(&schema::select_names_by_id(&self.table, batch.len()))?;
            let found = stmt
                .query_map(params_from_iter(batch.iter()), |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            for (id, name) in found {
                match name {
                    Some(name) => names.push(name),
                    None => nameless.push(self.nameless_row(id)),
                }
            }
        }
        Ok((names, nameless))
    }

    fn nameless_row(&self, id: i64) -> ResolveFailure {
        tracing::warn!("Row {} of table '{}' has no name", id, self.table.as_str());
        ResolveFailure {
            name: format!("<row {}>", id),
            count: 0,
            reason: "stored row has no name".to_string(),
        }
    }
}
