// Analysis module - some builder methods reserved for future use
#![allow(dead_code)]

pub mod coverage;
pub mod scanner;
pub mod suppression;

pub use coverage::CoverageAnalyzer;
pub use scanner::UnitScanner;
pub use suppression::SuppressionFilter;

use crate::ir::{Span, Unit};
use crate::registry::{ResourceDescriptor, ResourceKind, ResourceSpec, TypeRegistry};
use rayon::prelude::*;
use tracing::debug;

/// Severity levels for leak findings
///
/// Presentational only: severity never changes what gets reported,
/// just how reporters render and count it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Warning
    }
}

/// A resource handle whose cleanup is not guaranteed to run
#[derive(Debug, Clone)]
pub struct Leak {
    /// Resource type name, e.g. "ReadOnlyTransaction"
    pub resource: String,

    /// The method that should have been deferred
    pub cleanup_method: String,

    /// Resource kind, drives the rule code
    pub kind: ResourceKind,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message, e.g. "RowIterator.Stop() must be deferred"
    pub message: String,

    /// Where the handle was created
    pub location: Span,

    /// Fully qualified name of the containing function
    pub function: String,
}

impl Leak {
    pub fn new(descriptor: &ResourceDescriptor, location: Span, function: &str) -> Self {
        Self {
            resource: descriptor.name.clone(),
            cleanup_method: descriptor.cleanup_method.clone(),
            kind: descriptor.kind,
            severity: Severity::default(),
            message: descriptor.leak_message(),
            location,
            function: function.to_string(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Stable rule code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self.kind {
            ResourceKind::Transaction => "SC001",
            ResourceKind::Iterator => "SC002",
        }
    }
}

/// Entry point for running the analysis over loaded units.
///
/// The pipeline per unit: build the type registry from the unit's type
/// table, bail out early when it is empty, then scan every function
/// through the suppression filter.
#[derive(Debug, Default)]
pub struct LeakAnalyzer {
    /// Resource types registered on top of the builtin set
    resources: Vec<ResourceSpec>,

    /// Additional generated-file markers from configuration
    generated_markers: Vec<String>,

    /// Scan functions of each unit in parallel
    parallel: bool,
}

impl LeakAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Register extra resource types, usually from the config file.
    pub fn with_resources(mut self, resources: Vec<ResourceSpec>) -> Self {
        self.resources = resources;
        self
    }

    /// Extend the generated-file heuristics, usually from the config file.
    pub fn with_generated_markers(mut self, markers: Vec<String>) -> Self {
        self.generated_markers = markers;
        self
    }

    /// Analyze a single unit. A unit whose type table names none of the
    /// registered resource types produces no findings without visiting
    /// any function.
    pub fn analyze_unit(&self, unit: &Unit) -> Vec<Leak> {
        let registry = TypeRegistry::from_unit(unit, &self.resources);
        if registry.is_empty() {
            debug!("unit {} references no tracked resource types", unit.name);
            return Vec::new();
        }

        let suppression = SuppressionFilter::new(unit, &self.generated_markers);
        let scanner = UnitScanner::new(&registry, &suppression);

        if self.parallel {
            unit.functions
                .par_iter()
                .flat_map(|func| scanner.scan_function(func))
                .collect()
        } else {
            unit.functions
                .iter()
                .flat_map(|func| scanner.scan_function(func))
                .collect()
        }
    }

    /// Analyze every unit, sorted by file, line and column so output is
    /// deterministic across runs.
    pub fn analyze_units(&self, units: &[Unit]) -> Vec<Leak> {
        let mut leaks: Vec<Leak> = units.iter().flat_map(|u| self.analyze_unit(u)).collect();

        leaks.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });

        leaks
    }
}
