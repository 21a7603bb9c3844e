use crate::ingest::ResolveFailure;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::CARDS, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

/// Report cards that could not be resolved
pub fn failures(list: &[ResolveFailure]) {
    if list.is_empty() {
        return;
    }
    warn(&format!("{} card(s) could not be resolved", list.len()));
    for failure in list {
        eprintln!("   {} {}", Icons::CROSS, failure.to_string().style(theme().muted.clone()));
    }
}
