//! SSA export discovery.

pub mod export_finder;

pub use export_finder::{is_export, ExportFinder, EXPORT_SUFFIX};
