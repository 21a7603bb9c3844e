use crate::card::Card;
use crate::deck::{CostHistogram, Deck};
use crate::store::ResultSet;
use crate::ui::theme;
use owo_colors::OwoColorize;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

/// Two-column `Metric | Value` table; empty when there is nothing to show
pub fn stats_table(stats: &[(&str, &str)]) -> String {
    if stats.is_empty() {
        return String::new();
    }

    let mut builder = Builder::default();
    builder.push_record(["Metric".to_string(), "Value".to_string()]);
    for (label, value) in stats {
        builder.push_record([label.to_string(), value.to_string()]);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Color identity with each code in its own color
fn styled_colors(card: &Card) -> String {
    card.color_identity
        .iter()
        .map(|code| code.to_string().style(theme().color_code(*code)).to_string())
        .collect()
}

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "Qty")]
    count: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Cost")]
    mana_cost: String,
    #[tabled(rename = "CMC")]
    cmc: u32,
    #[tabled(rename = "Colors")]
    colors: String,
    #[tabled(rename = "Type")]
    card_type: String,
}

/// One row per card entry
pub fn cards_table(deck: &Deck) -> String {
    if deck.is_empty() {
        return String::new();
    }

    let rows: Vec<CardRow> = deck
        .cards
        .iter()
        .map(|c| CardRow {
            count: c.count,
            name: c.name.clone(),
            mana_cost: c.mana_cost.clone(),
            cmc: c.cmc,
            colors: styled_colors(c),
            card_type: c.card_type_text(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Cost curve with a bar per bucket; the 0 row counts lands
pub fn curve_table(histogram: &CostHistogram) -> String {
    let mut builder = Builder::default();
    builder.push_record(["CMC".to_string(), "Cards".to_string(), String::new()]);
    for (cmc, n) in histogram.curve() {
        let label = if cmc == 0 { "0 (lands)".to_string() } else { cmc.to_string() };
        builder.push_record([label, n.to_string(), "█".repeat(n)]);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Render an arbitrary query result
pub fn result_table(result: &ResultSet) -> String {
    let mut builder = Builder::default();
    builder.push_record(result.columns.iter().cloned());
    for row in &result.rows {
        builder.push_record(row.iter().map(|cell| cell.to_string()));
    }
    builder.build().with(Style::rounded()).to_string()
}
