//! Deckstore CLI - deck statistics, subsets and SQLite deck tables

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use deckstore::config::{self, DeckstoreConfig};
use deckstore::store::{self, TableStore};
use deckstore::ui::{self, Icons};
use deckstore::{Catalog, Deck, DeckListParser, TextScope};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "deckstore")]
#[command(version)]
#[command(about = "Card deck statistics, subsetting and SQLite-backed deck tables")]
#[command(long_about = r#"
Deckstore loads deck lists into one SQLite table per deck, then lets you:
  • Inspect card counts, land counts and the cost curve
  • Subset a deck by type/text, cost or color identity
  • Run arbitrary SQL against a deck table and rebuild a deck from the result

Example usage:
  deckstore load --file burn.txt --catalog cards.json
  deckstore stats --store burn.db
  deckstore query --store burn.db --sql "SELECT id, name FROM burn WHERE cmc <= 1" --rebuild
  deckstore query --store burn.db --sql "SELECT name, cmc FROM burn" --output curve.csv
  deckstore subset --store burn.db color R G --exact
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON card catalog used to resolve card names (overrides config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default deckstore.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Load a deck list or store file
    Load {
        /// Deck list (.txt, .dek, .csv, .tsv, .xml, .cod) or store (.db)
        #[arg(short, long)]
        file: PathBuf,

        /// Directory for the generated store (overrides config)
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },

    /// Show deck statistics and the cost curve
    Stats {
        /// Path to the store file
        #[arg(short, long)]
        store: PathBuf,
    },

    /// Run a SQL query against a deck store
    Query {
        /// Path to the store file
        #[arg(short, long)]
        store: PathBuf,

        /// Query text, passed to SQLite untouched
        #[arg(short = 'q', long)]
        sql: String,

        /// Rebuild a deck from the result
        #[arg(short, long)]
        rebuild: bool,

        /// Output format (text, json, csv)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Also write the query result to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Take a subset of a stored deck
    Subset {
        /// Path to the store file
        #[arg(short, long)]
        store: PathBuf,

        /// Also write the subset to its own store in this directory
        #[arg(long)]
        save: Option<PathBuf>,

        #[command(subcommand)]
        by: SubsetBy,
    },
}

#[derive(Subcommand)]
enum SubsetBy {
    /// Cards whose type line or rules text contains a string
    Text {
        /// Case-sensitive search string
        search: String,

        /// Where to search (type, text, any)
        #[arg(long, default_value = "any")]
        scope: String,
    },

    /// Split cards into equal / below / above a converted mana cost
    Cost {
        threshold: u32,
    },

    /// Cards sharing (or exactly matching) a color identity
    Color {
        /// Color codes, e.g. W U B R G
        colors: Vec<char>,

        /// Require the identity to match exactly
        #[arg(long)]
        exact: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let settings = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let defaults = DeckstoreConfig {
                store_dir: Some(".deckstore".to_string()),
                catalog: Some("cards.json".to_string()),
            };
            config::write_config(&path, &defaults, force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }

        Commands::Load { file, store_dir } => {
            let catalog = load_catalog(cli.catalog.as_deref(), &settings)?;
            let parser = DeckListParser::new(catalog.clone());
            let store_dir = store_dir.or_else(|| settings.store_dir());
            if let Some(dir) = &store_dir {
                config::ensure_store_dir(dir)?;
            }

            ui::header(&format!("Loading {}", file.display()));
            let loaded = store::load_from_file_kind(&file, store_dir.as_deref(), &parser, &catalog)?;

            print_summary(&loaded.deck);
            if let Some(path) = loaded.store.path() {
                ui::info("Store", &path.display().to_string());
            }
            ui::failures(&loaded.failures);
            ui::success(&format!("{} ready", loaded.deck.name));
        }

        Commands::Stats { store } => {
            let catalog = load_catalog(cli.catalog.as_deref(), &settings)?;
            let deck = open_deck(&store, &catalog)?;

            print_summary(&deck);
            ui::section(&format!("{} Cost curve", Icons::CURVE));
            println!("{}", ui::curve_table(&deck.cost_histogram()));
        }

        Commands::Query { store, sql, rebuild, format, output } => {
            let handle = TableStore::open(&store)?;
            let result = handle.run_query(&sql)?;

            if let Some(path) = &output {
                result.write_csv(path)?;
            }

            let rebuilt = if rebuild {
                let catalog = load_catalog(cli.catalog.as_deref(), &settings)?;
                Some(handle.reconstruct(&result, &catalog)?)
            } else {
                None
            };

            if format == "json" {
                let data = serde_json::json!({
                    "result": result,
                    "deck": rebuilt.as_ref().map(|r| &r.deck),
                    "failures": rebuilt.as_ref().map(|r| &r.failures),
                });
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else if format == "csv" {
                print!("{}", result.to_csv());
                if let Some(rebuilt) = rebuilt {
                    ui::failures(&rebuilt.failures);
                }
            } else {
                println!("{} {} row(s)", Icons::SEARCH, result.len());
                println!("{}", ui::result_table(&result));
                if let Some(rebuilt) = rebuilt {
                    ui::section(&format!("{} Rebuilt deck", Icons::CARDS));
                    println!("{}", ui::cards_table(&rebuilt.deck));
                    ui::failures(&rebuilt.failures);
                }
                if let Some(path) = &output {
                    ui::info("Saved", &path.display().to_string());
                }
            }
        }

        Commands::Subset { store, save, by } => {
            let catalog = load_catalog(cli.catalog.as_deref(), &settings)?;
            let deck = open_deck(&store, &catalog)?;

            let subsets = match by {
                SubsetBy::Text { search, scope } => {
                    let scope: TextScope = scope.parse()?;
                    vec![deck.subset_by_text(&search, scope)]
                }
                SubsetBy::Cost { threshold } => {
                    let parts = deck.subset_by_cost(threshold);
                    vec![parts.below, parts.equal, parts.above]
                }
                SubsetBy::Color { colors, exact } => {
                    let colors = colors.into_iter().map(|c| c.to_ascii_uppercase());
                    vec![deck.subset_by_color(colors, exact)]
                }
            };

            for subset in &subsets {
                ui::section(&format!("{} {} ({} cards)", Icons::SCALES, subset.name, subset.total_count()));
                if subset.is_empty() {
                    println!("  {}", ui::dim("no cards"));
                } else {
                    println!("{}", ui::cards_table(subset));
                }

                if let Some(dir) = &save {
                    config::ensure_store_dir(dir)?;
                    let saved = store::materialize(subset, dir)?;
                    if let Some(path) = saved.path() {
                        ui::info("Saved", &path.display().to_string());
                    }
                }
            }
        }
    }

    Ok(())
}

/// Catalog from the flag, then the config; empty when neither names one
fn load_catalog(flag: Option<&Path>, settings: &DeckstoreConfig) -> anyhow::Result<Catalog> {
    let path = flag.map(Path::to_path_buf).or_else(|| settings.catalog());
    match path {
        Some(path) => {
            let catalog = Catalog::load(&path)?;
            tracing::debug!("Using catalog {} ({} cards)", path.display(), catalog.len());
            Ok(catalog)
        }
        None => {
            ui::warn("No card catalog configured; every card will fail to resolve");
            Ok(Catalog::new())
        }
    }
}

fn open_deck(path: &Path, catalog: &Catalog) -> anyhow::Result<Deck> {
    let handle = TableStore::open(path)?;
    let rebuilt = handle.reload_deck(catalog)?;
    ui::failures(&rebuilt.failures);
    Ok(rebuilt.deck)
}

fn print_summary(deck: &Deck) {
    let summary = deck.summary();
    let total = summary.total.to_string();
    let unique = summary.unique.to_string();
    let lands = summary.lands.to_string();
    let average = summary
        .average_cost
        .map(|avg| format!("{:.2}", avg))
        .unwrap_or_else(|| "undefined".to_string());

    ui::section(&format!("{} {}", Icons::STATS, summary.name));
    println!(
        "{}",
        ui::stats_table(&[
            ("Cards", total.as_str()),
            ("Unique", unique.as_str()),
            ("Lands", lands.as_str()),
            ("Average cost", average.as_str()),
        ])
    );
}
