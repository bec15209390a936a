//! Cleanup coverage for resource values.
//!
//! A candidate value is covered when its release is guaranteed on every
//! exit path, which in practice means the cleanup runs under a defer.
//! Two shapes count: the value appears directly in a deferred call, or
//! the use site calling its cleanup method is itself the deferred
//! operation. Everything else (aliases, field stores, helper functions
//! that clean up on the caller's behalf) is out of scope and reported.

use crate::graph::DefUseGraph;
use crate::ir::{Instruction, OpKind, Span};
use crate::registry::{ResourceDescriptor, ResourceKind};

/// `client.Single()` yields a single-use transaction that releases
/// itself after its first read, so its result needs no explicit Close.
const SINGLE_USE_FACTORY: &str = "Single";

/// Decides whether one candidate value is exempt, covered, or leaking.
pub struct CoverageAnalyzer<'a> {
    graph: &'a DefUseGraph<'a>,
}

impl<'a> CoverageAnalyzer<'a> {
    pub fn new(graph: &'a DefUseGraph<'a>) -> Self {
        Self { graph }
    }

    /// Type-specific exemptions, checked before coverage:
    ///
    /// 1. a transaction produced by the single-use factory manages its
    ///    own lifetime;
    /// 2. an iterator returned to the caller hands the cleanup
    ///    obligation over with it.
    pub fn is_exempt(&self, candidate: &Instruction, descriptor: &ResourceDescriptor) -> bool {
        match descriptor.kind {
            ResourceKind::Transaction => self.is_from_single_use_factory(candidate),
            ResourceKind::Iterator => self.escapes_via_return(candidate),
        }
    }

    /// Whether some use of the candidate guarantees its cleanup runs.
    pub fn has_deferred_cleanup(
        &self,
        candidate: &Instruction,
        descriptor: &ResourceDescriptor,
    ) -> bool {
        for user in self.graph.uses_of(candidate.id) {
            // The value itself is an argument of a deferred call.
            if user.kind == OpKind::Defer {
                return true;
            }

            // The use is a call of the cleanup method on this value, and
            // that call is the thing being deferred.
            if self.is_deferred_cleanup_call(user, candidate, descriptor) {
                return true;
            }
        }
        false
    }

    /// Position to report the finding at. A tuple extraction points back
    /// at the call that produced the tuple, which is where the reader
    /// expects the message.
    pub fn report_span(&self, candidate: &Instruction) -> Option<Span> {
        if candidate.kind == OpKind::Extract {
            if let Some(tuple) = candidate
                .operands
                .first()
                .and_then(|id| self.graph.instruction(*id))
            {
                if tuple.span.is_some() {
                    return tuple.span.clone();
                }
            }
        }
        candidate.span.clone()
    }

    fn is_from_single_use_factory(&self, candidate: &Instruction) -> bool {
        candidate.kind == OpKind::Call && candidate.callee.as_deref() == Some(SINGLE_USE_FACTORY)
    }

    fn escapes_via_return(&self, candidate: &Instruction) -> bool {
        self.graph
            .uses_of(candidate.id)
            .iter()
            .any(|user| user.kind == OpKind::Return)
    }

    /// The call must invoke the descriptor's own cleanup method with the
    /// candidate as receiver. `go` statements do not count: a goroutine
    /// gives no guarantee the cleanup runs before the function exits.
    fn is_deferred_cleanup_call(
        &self,
        user: &Instruction,
        candidate: &Instruction,
        descriptor: &ResourceDescriptor,
    ) -> bool {
        if user.kind != OpKind::Call || !user.is_method_call {
            return false;
        }
        if user.callee.as_deref() != Some(descriptor.cleanup_method.as_str()) {
            return false;
        }
        if user.receiver() != Some(candidate.id) {
            return false;
        }

        self.graph
            .uses_of(user.id)
            .iter()
            .any(|u| u.kind == OpKind::Defer)
    }
}
