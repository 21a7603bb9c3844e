//! Deck - a named, ordered collection of cards
//!
//! Every operation here is read-only: subsets and histogram buckets are new
//! `Deck` values and the source deck is never mutated.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};
use crate::card::Card;
use crate::{Error, Result};

/// A named collection of cards, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Card>,
}

/// Where `subset_by_text` looks for the search string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextScope {
    /// Type strings only
    Type,
    /// Rules text only
    Text,
    /// Either of the above
    Any,
}

impl TextScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextScope::Type => "type",
            TextScope::Text => "text",
            TextScope::Any => "any",
        }
    }
}

impl std::str::FromStr for TextScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "type" | "types" => Ok(TextScope::Type),
            "text" | "oracle" => Ok(TextScope::Text),
            "any" | "all" => Ok(TextScope::Any),
            _ => Err(Error::Parse(format!("Unknown text scope: {}", s))),
        }
    }
}

/// Cards grouped by converted mana cost, in ascending cost order.
///
/// The zero-cost bucket holds lands only, so that it reports land count
/// instead of free spells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostHistogram {
    pub decks: BTreeMap<u32, Deck>,
    pub counts: BTreeMap<u32, usize>,
}

impl CostHistogram {
    /// `(cmc, card entries)` pairs, ascending by cmc
    pub fn curve(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.counts.iter().map(|(cmc, n)| (*cmc, *n))
    }

    pub fn bucket(&self, cmc: u32) -> Option<&Deck> {
        self.decks.get(&cmc)
    }
}

/// Result of `subset_by_cost`; every card lands in exactly one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostPartition {
    pub equal: Deck,
    pub below: Deck,
    pub above: Deck,
}

impl Deck {
    pub fn new(name: impl Into<String>, cards: Vec<Card>) -> Self {
        Self { name: name.into(), cards }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look up a card entry by exact name
    pub fn card(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn lands(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.is_land())
    }

    /// Total number of physical cards
    pub fn total_count(&self) -> u64 {
        self.cards.iter().map(|c| u64::from(c.count)).sum()
    }

    /// Number of card entries, not expanded by count
    pub fn unique_count(&self) -> usize {
        self.cards.len()
    }

    /// Copy-weighted mean cmc of the non-land cards.
    ///
    /// Returns `Error::DivisionUndefined` when the deck has no non-land copies.
    pub fn average_cost(&self) -> Result<f64> {
        let (copies, total) = self
            .cards
            .iter()
            .filter(|c| !c.is_land())
            .fold((0u64, 0u64), |(copies, total), c| {
                let n = u64::from(c.count);
                (copies + n, total + n * u64::from(c.cmc))
            });

        if copies == 0 {
            return Err(Error::DivisionUndefined { deck: self.name.clone() });
        }
        Ok(total as f64 / copies as f64)
    }

    /// Group cards by cmc. The zero bucket keeps lands only.
    pub fn cost_histogram(&self) -> CostHistogram {
        let mut grouped: BTreeMap<u32, Vec<Card>> = BTreeMap::new();
        for card in &self.cards {
            grouped.entry(card.cmc).or_default().push(card.clone());
        }

        if let Some(zero) = grouped.get_mut(&0) {
            zero.retain(Card::is_land);
        }

        let counts = grouped.iter().map(|(cmc, cards)| (*cmc, cards.len())).collect();
        let decks = grouped
            .into_iter()
            .map(|(cmc, cards)| (cmc, Deck::new(format!("cmc_{}", cmc), cards)))
            .collect();

        CostHistogram { decks, counts }
    }

    /// Cards whose type strings, rules text, or either contain `search`.
    ///
    /// Matching is case-sensitive substring containment.
    pub fn subset_by_text(&self, search: &str, scope: TextScope) -> Deck {
        let matches = |c: &Card| match scope {
            TextScope::Type => c.has_type(search),
            TextScope::Text => c.text.contains(search),
            TextScope::Any => c.has_type(search) || c.text.contains(search),
        };

        self.subset(format!("{}_subset", search), matches)
    }

    /// Split the deck around `threshold` by strict comparison of cmc.
    pub fn subset_by_cost(&self, threshold: u32) -> CostPartition {
        let mut equal = Vec::new();
        let mut below = Vec::new();
        let mut above = Vec::new();

        for card in &self.cards {
            match card.cmc.cmp(&threshold) {
                std::cmp::Ordering::Equal => equal.push(card.clone()),
                std::cmp::Ordering::Less => below.push(card.clone()),
                std::cmp::Ordering::Greater => above.push(card.clone()),
            }
        }

        CostPartition {
            equal: Deck::new(format!("cmc_{}", threshold), equal),
            below: Deck::new(format!("cmc_below_{}", threshold), below),
            above: Deck::new(format!("cmc_above_{}", threshold), above),
        }
    }

    /// Cards sharing a color with `colors`, or with exactly `colors` when `exact`.
    ///
    /// Color identities are compared as sets, so duplicate or reordered codes
    /// do not matter. Colorless cards only match an exact search for no colors.
    pub fn subset_by_color<I>(&self, colors: I, exact: bool) -> Deck
    where
        I: IntoIterator<Item = char>,
    {
        let wanted: BTreeSet<char> = colors.into_iter().collect();
        let label: String = if wanted.is_empty() {
            "colorless".to_string()
        } else {
            wanted.iter().collect()
        };

        self.subset(format!("{}_subset", label), |c| {
            let identity = c.colors();
            if exact {
                identity == wanted
            } else {
                !identity.is_disjoint(&wanted)
            }
        })
    }

    /// Summary statistics for display
    pub fn summary(&self) -> DeckSummary {
        DeckSummary {
            name: self.name.clone(),
            total: self.total_count(),
            unique: self.unique_count(),
            lands: self.lands().map(|c| u64::from(c.count)).sum(),
            average_cost: self.average_cost().ok(),
        }
    }

    fn subset<F>(&self, name: String, keep: F) -> Deck
    where
        F: Fn(&Card) -> bool,
    {
        let cards = self.cards.iter().filter(|c| keep(*c)).cloned().collect();
        Deck::new(name, cards)
    }
}

/// Headline numbers for a deck
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckSummary {
    pub name: String,
    pub total: u64,
    pub unique: usize,
    pub lands: u64,
    /// `None` when the deck has no non-land cards
    pub average_cost: Option<f64>,
}

impl std::fmt::Display for DeckSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Deck: {}", self.name)?;
        writeln!(f, "  Cards: {}", self.total)?;
        writeln!(f, "  Unique: {}", self.unique)?;
        writeln!(f, "  Lands: {}", self.lands)?;
        match self.average_cost {
            Some(avg) => writeln!(f, "  Average cost: {:.2}", avg),
            None => writeln!(f, "  Average cost: undefined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest(count: u32) -> Card {
        Card::new("Forest", count).with_type("Land")
    }

    fn bolt(count: u32) -> Card {
        Card::new("Bolt", count)
            .with_cost("{R}", 1)
            .with_colors(['R'])
            .with_type("Instant")
            .with_text("Bolt deals 3 damage to any target.")
    }

    fn scenario_deck() -> Deck {
        Deck::new("test", vec![forest(4), bolt(2)])
    }

    fn mixed_deck() -> Deck {
        Deck::new(
            "mixed",
            vec![
                forest(10),
                bolt(4),
                Card::new("Ornithopter", 2).with_cost("{0}", 0).with_type("Artifact Creature — Thopter"),
                Card::new("Growth", 3)
                    .with_cost("{G}", 1)
                    .with_colors(['G'])
                    .with_type("Instant")
                    .with_text("Target creature gets +3/+3."),
                Card::new("Charm", 2)
                    .with_cost("{R}{G}", 2)
                    .with_colors(['R', 'G'])
                    .with_type("Instant"),
                Card::new("Giant", 1)
                    .with_cost("{4}{G}{G}", 6)
                    .with_colors(['G', 'G'])
                    .with_type("Creature — Giant")
                    .with_text("Trample"),
                Card::new("Mox", 1).with_cost("{0}", 0).with_type("Artifact"),
                Card::new("Arbor", 1).with_colors(['G']).with_type("Land Creature — Forest Dryad"),
            ],
        )
    }

    #[test]
    fn test_scenario_statistics() {
        let deck = scenario_deck();
        assert_eq!(deck.total_count(), 6);
        assert_eq!(deck.unique_count(), 2);
        assert_eq!(deck.average_cost().unwrap(), 1.0);
    }

    #[test]
    fn test_scenario_histogram() {
        let hist = scenario_deck().cost_histogram();
        assert_eq!(hist.bucket(0).unwrap().names(), vec!["Forest"]);
        assert_eq!(hist.counts[&0], 1);
        assert_eq!(hist.bucket(1).unwrap().names(), vec!["Bolt"]);
        assert_eq!(hist.counts[&1], 1);
    }

    #[test]
    fn test_scenario_cost_partition() {
        let parts = scenario_deck().subset_by_cost(1);
        assert_eq!(parts.equal.names(), vec!["Bolt"]);
        assert_eq!(parts.below.names(), vec!["Forest"]);
        assert!(parts.above.is_empty());
    }

    #[test]
    fn test_total_count_sums_copies() {
        let deck = mixed_deck();
        let expected: u64 = deck.cards.iter().map(|c| c.count as u64).sum();
        assert_eq!(deck.total_count(), expected);
        assert_eq!(deck.total_count(), 24);
    }

    #[test]
    fn test_average_cost_ignores_lands() {
        let deck = mixed_deck();
        let avg = deck.average_cost().unwrap();

        let mut without_forest = deck.clone();
        without_forest.cards.retain(|c| c.name != "Forest");
        assert_eq!(without_forest.average_cost().unwrap(), avg);

        // Bolt 4*1 + Ornithopter 2*0 + Growth 3*1 + Charm 2*2 + Giant 1*6 + Mox 1*0 over 13 copies
        assert!((avg - 17.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_cost_undefined_without_spells() {
        let deck = Deck::new("lands", vec![forest(20)]);
        assert!(matches!(deck.average_cost(), Err(Error::DivisionUndefined { .. })));
        assert!(matches!(Deck::empty("nothing").average_cost(), Err(Error::DivisionUndefined { .. })));
    }

    #[test]
    fn test_zero_bucket_holds_only_lands() {
        let hist = mixed_deck().cost_histogram();
        let zero = hist.bucket(0).unwrap();
        assert_eq!(zero.names(), vec!["Forest", "Arbor"]);
        assert!(zero.cards.iter().all(Card::is_land));
        assert_eq!(hist.counts[&0], 2);
    }

    #[test]
    fn test_zero_bucket_kept_when_only_free_spells() {
        let deck = Deck::new("free", vec![Card::new("Mox", 1).with_type("Artifact"), bolt(1)]);
        let hist = deck.cost_histogram();
        assert!(hist.bucket(0).unwrap().is_empty());
        assert_eq!(hist.counts[&0], 0);
    }

    #[test]
    fn test_histogram_counts_entries_in_ascending_order() {
        let hist = mixed_deck().cost_histogram();
        let curve: Vec<_> = hist.curve().collect();
        assert_eq!(curve, vec![(0, 2), (1, 2), (2, 1), (6, 1)]);
    }

    #[test]
    fn test_subset_by_text_scopes() {
        let deck = mixed_deck();

        let instants = deck.subset_by_text("Instant", TextScope::Type);
        assert_eq!(instants.name, "Instant_subset");
        assert_eq!(instants.names(), vec!["Bolt", "Growth", "Charm"]);

        let damage = deck.subset_by_text("damage", TextScope::Text);
        assert_eq!(damage.names(), vec!["Bolt"]);

        let forest_any = deck.subset_by_text("Forest", TextScope::Any);
        assert_eq!(forest_any.names(), vec!["Arbor"]);

        let trample = deck.subset_by_text("Trample", TextScope::Any);
        assert_eq!(trample.names(), vec!["Giant"]);
    }

    #[test]
    fn test_subset_by_text_case_sensitive_and_empty() {
        let deck = mixed_deck();
        assert!(deck.subset_by_text("instant", TextScope::Type).is_empty());
        assert!(deck.subset_by_text("Sorcery", TextScope::Any).is_empty());
    }

    #[test]
    fn test_subset_by_cost_partitions_are_exhaustive_and_disjoint() {
        let deck = mixed_deck();
        for threshold in 0..8 {
            let parts = deck.subset_by_cost(threshold);
            let sizes = parts.equal.unique_count() + parts.below.unique_count() + parts.above.unique_count();
            assert_eq!(sizes, deck.unique_count());

            for card in &deck.cards {
                let hits = [&parts.equal, &parts.below, &parts.above]
                    .iter()
                    .filter(|d| d.card(&card.name).is_some())
                    .count();
                assert_eq!(hits, 1, "{} in {} partitions", card.name, hits);
            }
        }
    }

    #[test]
    fn test_subset_by_cost_names_are_stable() {
        let parts = mixed_deck().subset_by_cost(2);
        assert_eq!(parts.equal.name, "cmc_2");
        assert_eq!(parts.below.name, "cmc_below_2");
        assert_eq!(parts.above.name, "cmc_above_2");
    }

    #[test]
    fn test_subset_by_color_intersection() {
        let deck = mixed_deck();
        let green = deck.subset_by_color(['G'], false);
        assert_eq!(green.name, "G_subset");
        assert_eq!(green.names(), vec!["Growth", "Charm", "Giant", "Arbor"]);
    }

    #[test]
    fn test_subset_by_color_exact_uses_set_equality() {
        let deck = mixed_deck();

        // Giant lists G twice; still an exact mono-green match
        let mono_green = deck.subset_by_color(['G'], true);
        assert_eq!(mono_green.names(), vec!["Growth", "Giant", "Arbor"]);

        let gruul = deck.subset_by_color(['R', 'G'], true);
        assert_eq!(gruul.name, "GR_subset");
        assert_eq!(gruul.names(), vec!["Charm"]);
    }

    #[test]
    fn test_subset_by_color_exact_is_subset_of_intersection() {
        let deck = mixed_deck();
        for colors in [vec!['G'], vec!['R'], vec!['R', 'G'], vec!['W', 'U']] {
            let exact = deck.subset_by_color(colors.clone(), true);
            let loose = deck.subset_by_color(colors, false);
            for name in exact.names() {
                assert!(loose.card(name).is_some());
            }
        }
    }

    #[test]
    fn test_subset_by_color_colorless() {
        let deck = mixed_deck();

        let colorless = deck.subset_by_color(std::iter::empty(), true);
        assert_eq!(colorless.name, "colorless_subset");
        assert_eq!(colorless.names(), vec!["Forest", "Ornithopter", "Mox"]);

        assert!(deck.subset_by_color(std::iter::empty(), false).is_empty());
        assert!(deck.subset_by_color(['W'], false).card("Mox").is_none());
    }

    #[test]
    fn test_subsets_do_not_mutate_source() {
        let deck = mixed_deck();
        let before = deck.clone();
        let _ = deck.subset_by_text("Land", TextScope::Type);
        let _ = deck.subset_by_cost(1);
        let _ = deck.subset_by_color(['G'], true);
        let _ = deck.cost_histogram();
        assert_eq!(deck, before);
    }

    #[test]
    fn test_summary() {
        let summary = scenario_deck().summary();
        assert_eq!(summary.total, 6);
        assert_eq!(summary.unique, 2);
        assert_eq!(summary.lands, 4);
        assert_eq!(summary.average_cost, Some(1.0));

        let lands_only = Deck::new("lands", vec![forest(3)]).summary();
        assert_eq!(lands_only.average_cost, None);
        assert!(lands_only.to_string().contains("undefined"));
    }

    #[test]
    fn test_text_scope_from_str() {
        assert_eq!("type".parse::<TextScope>().unwrap(), TextScope::Type);
        assert_eq!("TEXT".parse::<TextScope>().unwrap(), TextScope::Text);
        assert_eq!("any".parse::<TextScope>().unwrap(), TextScope::Any);
        assert!("color".parse::<TextScope>().is_err());
    }
}
