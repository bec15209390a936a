//! spannercheck - Find Cloud Spanner handles without a deferred cleanup
//!
//! This library analyzes SSA exports of Go packages and reports Spanner
//! transactions and row iterators whose Close/Stop is not guaranteed to
//! run.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Export Discovery** - Find all .ssa.json exports
//! 2. **Loading** - Deserialize each export into a typed unit
//! 3. **Type Registry** - Map type-table ids to tracked resource types
//! 4. **Scanning** - Walk every function's instructions for candidates
//! 5. **Coverage** - Check exemptions and deferred-cleanup coverage
//! 6. **Reporting** - Output results in various formats

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod graph;
pub mod ir;
pub mod registry;
pub mod report;

pub use analysis::{Leak, LeakAnalyzer, Severity};
pub use config::Config;
pub use discovery::ExportFinder;
pub use graph::DefUseGraph;
pub use ir::{Span, Unit};
pub use registry::{ResourceDescriptor, ResourceKind, ResourceSpec, TypeRegistry};
pub use report::{ReportFormat, Reporter};
