//! Configuration file loading.

pub mod loader;

pub use loader::{Config, ReportConfig};
