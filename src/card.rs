//! Card - a single named card and its static attributes
//!
//! A card carries its own copy count: a deck holds one `Card` per distinct
//! name, never duplicate entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Type-line fragment that marks a card as a land.
pub const LAND_TYPE: &str = "Land";

/// Separator used when several type strings are flattened into one column.
pub const TYPE_SEPARATOR: &str = " // ";

/// A card as known at the time it was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Display name, unique within a deck
    pub name: String,
    /// Number of physical copies this entry stands for (>= 1)
    #[serde(default = "default_count")]
    pub count: u32,
    /// Symbolic cost such as `{1}{R}`, not interpreted
    #[serde(default)]
    pub mana_cost: String,
    /// Converted mana cost
    #[serde(default)]
    pub cmc: u32,
    /// Single-letter color codes, empty for colorless cards
    #[serde(default)]
    pub color_identity: Vec<char>,
    /// One or more type strings
    #[serde(default)]
    pub card_type: Vec<String>,
    /// Rules text
    #[serde(default)]
    pub text: String,
    /// URL or path of the card artwork
    #[serde(default, alias = "im_url")]
    pub image_locator: String,
}

fn default_count() -> u32 {
    1
}

impl Card {
    /// Create a card with a name and count; every other attribute is empty.
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
            mana_cost: String::new(),
            cmc: 0,
            color_identity: Vec::new(),
            card_type: Vec::new(),
            text: String::new(),
            image_locator: String::new(),
        }
    }

    pub fn with_cost(mut self, mana_cost: impl Into<String>, cmc: u32) -> Self {
        self.mana_cost = mana_cost.into();
        self.cmc = cmc;
        self
    }

    pub fn with_colors(mut self, colors: impl IntoIterator<Item = char>) -> Self {
        self.color_identity = colors.into_iter().collect();
        self
    }

    pub fn with_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type.push(card_type.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_image(mut self, locator: impl Into<String>) -> Self {
        self.image_locator = locator.into();
        self
    }

    /// Copy of this card with a different count.
    pub fn recounted(&self, count: u32) -> Self {
        Self { count, ..self.clone() }
    }

    /// True when any type string contains `"Land"`.
    pub fn is_land(&self) -> bool {
        self.has_type(LAND_TYPE)
    }

    /// Substring test against every type string.
    pub fn has_type(&self, fragment: &str) -> bool {
        self.card_type.iter().any(|t| t.contains(fragment))
    }

    /// Deduplicated, order-independent color identity.
    pub fn colors(&self) -> BTreeSet<char> {
        self.color_identity.iter().copied().collect()
    }

    pub fn is_colorless(&self) -> bool {
        self.color_identity.is_empty()
    }

    /// Text form of the color identity, e.g. `"BW"`.
    pub fn color_identity_text(&self) -> String {
        self.color_identity.iter().collect()
    }

    /// Text form of the type strings.
    pub fn card_type_text(&self) -> String {
        self.card_type.join(TYPE_SEPARATOR)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x {}", self.count, self.name)?;
        if !self.mana_cost.is_empty() {
            write!(f, " {}", self.mana_cost)?;
        }
        Ok(())
    }
}
