//! Local card catalog
//!
//! An in-memory table of card templates keyed by name. Lookups try the exact
//! name first and then an ASCII case-insensitive match.

use std::collections::HashMap;
use std::path::Path;
use crate::card::Card;
use crate::{Error, Result};
use super::CardResolver;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: HashMap<String, Card>,
    /// Lowercased name -> canonical name
    folded: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut catalog = Self::new();
        for card in cards {
            catalog.insert(card);
        }
        catalog
    }

    /// Load a catalog from a JSON array of cards
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let cards: Vec<Card> = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded {} catalog entries from {}", cards.len(), path.display());
        Ok(Self::from_cards(cards))
    }

    /// Add or replace a template. Later entries win.
    pub fn insert(&mut self, card: Card) {
        self.folded.insert(card.name.to_ascii_lowercase(), card.name.clone());
        self.cards.insert(card.name.clone(), card);
    }

    pub fn get(&self, name: &str) -> Option<&Card> {
        self.cards.get(name).or_else(|| {
            self.folded
                .get(&name.trim().to_ascii_lowercase())
                .and_then(|canonical| self.cards.get(canonical))
        })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardResolver for Catalog {
    fn resolve_card(&self, name: &str, count: u32) -> Result<Card> {
        self.get(name)
            .map(|template| template.recounted(count))
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_catalog() -> Catalog {
        Catalog::from_cards([
            Card::new("Lightning Bolt", 1).with_cost("{R}", 1).with_type("Instant"),
            Card::new("Forest", 1).with_type("Basic Land — Forest"),
        ])
    }

    #[test]
    fn test_resolve_applies_count() {
        let catalog = sample_catalog();
        let card = catalog.resolve_card("Lightning Bolt", 4).unwrap();
        assert_eq!(card.count, 4);
        assert_eq!(card.cmc, 1);
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let catalog = sample_catalog();
        let card = catalog.resolve_card("lightning bolt", 2).unwrap();
        assert_eq!(card.name, "Lightning Bolt");
    }

    #[test]
    fn test_resolve_unknown() {
        let catalog = sample_catalog();
        assert!(matches!(catalog.resolve_card("Black Lotus", 1), Err(Error::NotFound(n)) if n == "Black Lotus"));
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Island", "card_type": ["Basic Land — Island"], "color_identity": []}},
                {{"name": "Opt", "mana_cost": "{{U}}", "cmc": 1, "color_identity": ["U"], "card_type": ["Instant"], "text": "Scry 1.\nDraw a card."}}]"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);

        let opt = catalog.resolve_card("Opt", 3).unwrap();
        assert_eq!(opt.mana_cost, "{U}");
        assert_eq!(opt.color_identity, vec!['U']);
        assert!(catalog.resolve_card("Island", 1).unwrap().is_land());
    }
}
