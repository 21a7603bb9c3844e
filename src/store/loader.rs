//! Loading a deck from any supported file
//!
//! Deck lists are parsed by the ingestion side and then materialized; store
//! files are opened and reloaded. No parsing happens here.

use std::path::Path;
use crate::deck::Deck;
use crate::ingest::{CardResolver, DeckParser, FileKind, ResolveFailure};
use crate::Result;
use super::sqlite::{materialize, TableStore};

/// A loaded deck together with its open store
pub struct Loaded {
    pub deck: Deck,
    pub store: TableStore,
    pub failures: Vec<ResolveFailure>,
}

/// Load `path` according to its file kind.
///
/// Deck lists are materialized into `store_dir`, or next to the source file
/// when no directory is given. `.db` files are opened as they are.
pub fn load_from_file_kind<P, R>(
    path: &Path,
    store_dir: Option<&Path>,
    parser: &P,
    resolver: &R,
) -> Result<Loaded>
where
    P: DeckParser + ?Sized,
    R: CardResolver + ?Sized,
{
    let kind = FileKind::from_path(path)?;
    tracing::debug!("Loading {} as {:?}", path.display(), kind);

    match kind {
        FileKind::DeckList | FileKind::XmlDeckList => {
            let parsed = parser.parse_deck_file(path)?;
            let dir = store_dir
                .or_else(|| path.parent())
                .unwrap_or_else(|| Path::new("."));
            let store = materialize(&parsed.deck, dir)?;
            Ok(Loaded { deck: parsed.deck, store, failures: parsed.failures })
        }
        FileKind::Store => {
            let store = TableStore::open(path)?;
            let rebuilt = store.reload_deck(resolver)?;
            Ok(Loaded { deck: rebuilt.deck, store, failures: rebuilt.failures })
        }
    }
}
