//! Linear scan over function bodies.
//!
//! Every instruction that produces a value of a registered resource
//! type is a candidate. The scan runs the exemption checks, then
//! cleanup coverage, then line-level suppression against the resolved
//! position, and reports whatever survives. There is no path
//! sensitivity here: one pass over the instruction list per function.

use crate::analysis::coverage::CoverageAnalyzer;
use crate::analysis::suppression::SuppressionFilter;
use crate::analysis::Leak;
use crate::graph::DefUseGraph;
use crate::ir::Function;
use crate::registry::TypeRegistry;
use tracing::{debug, trace};

/// Scans the functions of one compilation unit.
pub struct UnitScanner<'a> {
    registry: &'a TypeRegistry,
    suppression: &'a SuppressionFilter<'a>,
}

impl<'a> UnitScanner<'a> {
    pub fn new(registry: &'a TypeRegistry, suppression: &'a SuppressionFilter<'a>) -> Self {
        Self {
            registry,
            suppression,
        }
    }

    /// Scan one function and collect its leaks.
    pub fn scan_function(&self, func: &Function) -> Vec<Leak> {
        if self.suppression.should_skip_file(&func.file) {
            debug!("skipping {} (generated or suppressed file)", func.file);
            return Vec::new();
        }

        let graph = DefUseGraph::build(func);
        let coverage = CoverageAnalyzer::new(&graph);
        let mut leaks = Vec::new();

        for candidate in func.instructions() {
            let Some(type_id) = candidate.type_id else {
                continue;
            };
            let Some(descriptor) = self.registry.lookup(type_id) else {
                continue;
            };

            if coverage.is_exempt(candidate, descriptor) {
                trace!(
                    "exempt {} value in {}",
                    descriptor.name,
                    func.short_name
                );
                continue;
            }
            if coverage.has_deferred_cleanup(candidate, descriptor) {
                continue;
            }

            let Some(span) = coverage.report_span(candidate) else {
                debug!(
                    "uncovered {} value in {} has no position, dropping",
                    descriptor.name, func.name
                );
                continue;
            };

            if self.suppression.is_line_suppressed(&span.file, span.line) {
                trace!("suppressed finding at {}", span);
                continue;
            }

            leaks.push(Leak::new(descriptor, span, &func.name));
        }

        leaks
    }
}
