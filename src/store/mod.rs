//! Storage Layer - one SQLite table per deck
//!
//! Each deck lives in `<dir>/<deck>.db` in a table named `<deck>`:
//! - id, name, count, mana_cost, cmc, color_identity, card_type, text, im_url
//!
//! Tables are replaced wholesale on every write. Queries are passed through
//! untouched and their results can be turned back into decks.

pub mod loader;
pub mod result;
pub mod schema;
pub mod sqlite;

pub use loader::{load_from_file_kind, Loaded};
pub use result::{Cell, ResultSet};
pub use schema::TableName;
pub use sqlite::{materialize, target_path, Reconstruction, TableStore};
pub use crate::ingest::ResolveFailure;
