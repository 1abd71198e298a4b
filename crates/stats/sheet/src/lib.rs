//! Character sheets built from data files.
//!
//! A sheet lists editable stats and the totals derived from them. Loading a
//! sheet wires every total to its members through `stat-core` aggregates, so
//! editing a stat keeps all dependent totals current.

pub mod format;
pub mod loader;
pub mod sheet;

pub use format::{SheetSpec, TotalSpec, format_reference, parse_reference};
pub use loader::{LoadResult, SheetLoader};
pub use sheet::{Sheet, SheetTotal};
