//! Deck-list file parsing
//!
//! Supported inputs:
//! - `.txt` / `.dek`: one `<qty> <name>` entry per line (`4x Name` also accepted)
//! - `.csv` / `.tsv`: a header row with `Qty` and `Name` columns
//! - `.xml` / `.cod`: `<card number="4" name="..."/>` elements
//!
//! Every entry is resolved through a `CardResolver`; the deck is named after
//! the file stem.

use std::path::Path;
use std::sync::OnceLock;
use regex::Regex;
use crate::{Error, Result};
use super::{resolve_entries, CardResolver, DeckParser, FileKind, ParsedDeck};

static CARD_ELEMENT: OnceLock<Regex> = OnceLock::new();
static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();

fn card_element() -> &'static Regex {
    CARD_ELEMENT.get_or_init(|| Regex::new(r"<card\b([^>]*)>").expect("static card element pattern"))
}

fn attribute() -> &'static Regex {
    ATTRIBUTE.get_or_init(|| Regex::new(r#"([A-Za-z_][\w.-]*)\s*=\s*"([^"]*)""#).expect("static attribute pattern"))
}

/// Parses deck-list files and resolves their entries
pub struct DeckListParser<R> {
    resolver: R,
}

impl<R: CardResolver> DeckListParser<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<R: CardResolver> DeckParser for DeckListParser<R> {
    fn parse_deck_file(&self, path: &Path) -> Result<ParsedDeck> {
        let contents = std::fs::read_to_string(path)?;
        let entries = read_entries(path, &contents)?;
        let name = deck_name(path);

        tracing::info!("Parsed {} entries from {}", entries.len(), path.display());
        let (deck, failures) = resolve_entries(&self.resolver, &name, entries);
        if !failures.is_empty() {
            tracing::warn!("{} of the entries in {} could not be resolved", failures.len(), path.display());
        }
        Ok(ParsedDeck { deck, failures })
    }
}

fn deck_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "deck".to_string())
}

/// Extract `(name, count)` entries according to the file extension
pub fn read_entries(path: &Path, contents: &str) -> Result<Vec<(String, u32)>> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    match (FileKind::from_path(path)?, ext.as_str()) {
        (FileKind::DeckList, "csv") => parse_delimited(contents, ','),
        (FileKind::DeckList, "tsv") => parse_delimited(contents, '\t'),
        (FileKind::DeckList, _) => parse_plain(contents),
        (FileKind::XmlDeckList, _) => parse_xml(contents),
        (FileKind::Store, _) => Err(Error::UnsupportedFile(path.to_path_buf())),
    }
}

fn parse_count(raw: &str, line: usize) -> Result<u32> {
    let raw = raw.trim();
    let digits = raw.strip_suffix(|c: char| c == 'x' || c == 'X').unwrap_or(raw);
    // Spreadsheet exports sometimes write counts as "4.0"
    let digits = digits.strip_suffix(".0").unwrap_or(digits);

    match digits.parse::<u32>() {
        Ok(0) => Err(Error::Parse(format!("line {}: card count must be positive", line))),
        Ok(n) => Ok(n),
        Err(_) => Err(Error::Parse(format!("line {}: invalid card count '{}'", line, raw))),
    }
}

fn parse_plain(contents: &str) -> Result<Vec<(String, u32)>> {
    let mut entries = Vec::new();

    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }

        let (qty, name) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| Error::Parse(format!("line {}: expected '<qty> <name>'", i + 1)))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Parse(format!("line {}: missing card name", i + 1)));
        }
        entries.push((name.to_string(), parse_count(qty, i + 1)?));
    }

    Ok(entries)
}

/// Split one delimited record, honouring double-quoted fields
fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            c if c == delimiter && !quoted => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn parse_delimited(contents: &str, delimiter: char) -> Result<Vec<(String, u32)>> {
    let mut lines = contents.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| Error::Parse("missing header row".to_string()))?;
    let header = split_record(header, delimiter);
    let column = |wanted: &str| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::Parse(format!("missing '{}' column", wanted)))
    };
    let qty_col = column("Qty")?;
    let name_col = column("Name")?;

    let mut entries = Vec::new();
    for (i, line) in lines {
        let record = split_record(line, delimiter);
        let qty = record.get(qty_col).map(|s| s.trim()).unwrap_or("");
        let name = record.get(name_col).map(|s| s.trim()).unwrap_or("");

        if qty.is_empty() || name.is_empty() {
            tracing::debug!("Skipping incomplete row {}", i + 1);
            continue;
        }
        entries.push((name.to_string(), parse_count(qty, i + 1)?));
    }

    Ok(entries)
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn parse_xml(contents: &str) -> Result<Vec<(String, u32)>> {
    let mut entries = Vec::new();

    for (i, element) in card_element().captures_iter(contents).enumerate() {
        let mut name = None;
        let mut number = None;

        for attr in attribute().captures_iter(&element[1]) {
            match &attr[1] {
                "name" => name = Some(decode_entities(&attr[2])),
                "number" => number = Some(attr[2].to_string()),
                _ => {}
            }
        }

        let name = name.ok_or_else(|| Error::Parse(format!("card element {} has no name", i + 1)))?;
        let number = number.ok_or_else(|| Error::Parse(format!("card '{}' has no number", name)))?;
        entries.push((name, parse_count(&number, i + 1)?));
    }

    Ok(entries)
}
