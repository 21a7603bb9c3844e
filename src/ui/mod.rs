pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, failures, header, info, section, success, warn};
pub use table::{cards_table, curve_table, result_table, stats_table};
pub use theme::theme;
