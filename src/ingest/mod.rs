//! Ingestion seam - how cards and deck files enter the system
//!
//! The core only needs two capabilities from the outside world:
//! - `CardResolver`: turn a card name and count into a populated `Card`
//! - `DeckParser`: turn a deck-list file into a populated `Deck`
//!
//! `Catalog` and `DeckListParser` are the local implementations shipped
//! with the crate.

pub mod catalog;
pub mod decklist;

pub use catalog::Catalog;
pub use decklist::DeckListParser;

use std::collections::HashMap;
use std::path::Path;
use crate::card::Card;
use crate::deck::Deck;
use crate::{Error, Result};

/// Resolves a card name into a fully populated card.
pub trait CardResolver {
    /// Resolve `name`, giving the result `count` copies.
    ///
    /// Fails with `Error::NotFound` when the name is unknown.
    fn resolve_card(&self, name: &str, count: u32) -> Result<Card>;
}

impl<F> CardResolver for F
where
    F: Fn(&str, u32) -> Result<Card>,
{
    fn resolve_card(&self, name: &str, count: u32) -> Result<Card> {
        self(name, count)
    }
}

/// A parsed deck plus the entries that failed to resolve
#[derive(Debug, Clone)]
pub struct ParsedDeck {
    pub deck: Deck,
    pub failures: Vec<ResolveFailure>,
}

/// Parses a deck-list file into a deck.
pub trait DeckParser {
    /// Parse `path` and resolve its entries.
    ///
    /// Entries that cannot be resolved are left out of the deck and listed in
    /// `ParsedDeck::failures`; only an unreadable or malformed file is an error.
    fn parse_deck_file(&self, path: &Path) -> Result<ParsedDeck>;
}

/// File classes understood by the loader, keyed by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Plain or delimited text: `.txt`, `.dek`, `.csv`, `.tsv`
    DeckList,
    /// XML deck lists: `.xml`, `.cod`
    XmlDeckList,
    /// An existing deck store: `.db`
    Store,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "dek" | "csv" | "tsv" => Ok(FileKind::DeckList),
            "xml" | "cod" => Ok(FileKind::XmlDeckList),
            "db" => Ok(FileKind::Store),
            _ => Err(Error::UnsupportedFile(path.to_path_buf())),
        }
    }
}

/// A card that could not be resolved, with the reason
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ResolveFailure {
    pub name: String,
    pub count: u32,
    pub reason: String,
}

impl std::fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x {}: {}", self.count, self.name, self.reason)
    }
}

/// Resolve every `(name, count)` entry, skipping the ones that fail.
///
/// Entries that resolve to the same card name are merged into one entry with
/// the counts summed, so the deck stays unique by name. Failures are returned
/// alongside the deck instead of aborting the batch.
pub fn resolve_entries<R, I>(resolver: &R, deck_name: &str, entries: I) -> (Deck, Vec<ResolveFailure>)
where
    R: CardResolver + ?Sized,
    I: IntoIterator<Item = (String, u32)>,
{
    let mut cards: Vec<Card> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut failures = Vec::new();

    for (name, count) in entries {
        match resolver.resolve_card(&name, count) {
            Ok(card) => match by_name.get(&card.name) {
                Some(&idx) => {
                    let merged = &mut cards[idx];
                    merged.count = merged.count.saturating_add(card.count);
                    tracing::debug!("Merged {}x {} into {}", count, name, merged.name);
                }
                None => {
                    tracing::debug!("Resolved {}x {}", count, name);
                    by_name.insert(card.name.clone(), cards.len());
                    cards.push(card);
                }
            },
            Err(e) => {
                tracing::warn!("Could not resolve '{}': {}", name, e);
                failures.push(ResolveFailure {
                    name,
                    count,
                    reason: e.to_string(),
                });
            }
        }
    }

    (Deck::new(deck_name, cards), failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_kind_dispatch() {
        let kind = |p: &str| FileKind::from_path(&PathBuf::from(p));
        assert_eq!(kind("decks/burn.txt").unwrap(), FileKind::DeckList);
        assert_eq!(kind("burn.CSV").unwrap(), FileKind::DeckList);
        assert_eq!(kind("burn.tsv").unwrap(), FileKind::DeckList);
        assert_eq!(kind("burn.dek").unwrap(), FileKind::DeckList);
        assert_eq!(kind("burn.cod").unwrap(), FileKind::XmlDeckList);
        assert_eq!(kind("burn.xml").unwrap(), FileKind::XmlDeckList);
        assert_eq!(kind("burn.db").unwrap(), FileKind::Store);
        assert!(matches!(kind("burn.json"), Err(Error::UnsupportedFile(_))));
        assert!(matches!(kind("burn"), Err(Error::UnsupportedFile(_))));
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |name: &str, count: u32| -> Result<Card> {
            if name == "Bolt" {
                Ok(Card::new(name, count).with_cost("{R}", 1))
            } else {
                Err(Error::NotFound(name.to_string()))
            }
        };

        let entries = vec![("Bolt".to_string(), 4), ("Nope".to_string(), 2)];
        let (deck, failures) = resolve_entries(&resolver, "burn", entries);

        assert_eq!(deck.name, "burn");
        assert_eq!(deck.names(), vec!["Bolt"]);
        assert_eq!(deck.cards[0].count, 4);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "Nope");
        assert_eq!(failures[0].count, 2);
    }

    #[test]
    fn test_repeated_entries_merge_by_resolved_name() {
        let resolver = |name: &str, count: u32| -> Result<Card> {
            match name.to_ascii_lowercase().as_str() {
                "bolt" => Ok(Card::new("Bolt", count).with_cost("{R}", 1)),
                "forest" => Ok(Card::new("Forest", count).with_type("Land")),
                _ => Err(Error::NotFound(name.to_string())),
            }
        };

        let entries = vec![
            ("Bolt".to_string(), 4),
            ("Forest".to_string(), 10),
            ("bolt".to_string(), 2),
            ("FOREST".to_string(), 6),
        ];
        let (deck, failures) = resolve_entries(&resolver, "burn", entries);

        assert!(failures.is_empty());
        assert_eq!(deck.names(), vec!["Bolt", "Forest"]);
        assert_eq!(deck.unique_count(), 2);
        assert_eq!(deck.card("Bolt").unwrap().count, 6);
        assert_eq!(deck.card("Forest").unwrap().count, 16);
    }
}
