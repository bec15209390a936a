//! Per-function def-use graph.
//!
//! Values are nodes, keyed by the id of their producing instruction;
//! every operand reference adds a labeled edge from producer to
//! consumer. The coverage analysis walks outgoing edges to enumerate a
//! candidate's use sites, so the def-use relation is explicit data
//! rather than something recomputed per query.

// Graph module - some query methods reserved for future use
#![allow(dead_code)]

use crate::ir::{Function, Instruction, ValueId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Edge label: the operand slot through which the consumer refers to the
/// produced value. Slot 0 of a method call is the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseEdge {
    pub slot: usize,
}

/// Def-use graph for one function body.
#[derive(Debug)]
pub struct DefUseGraph<'a> {
    /// Nodes are value ids, edges run producer -> consumer.
    inner: DiGraph<ValueId, UseEdge>,

    /// Map from value id to node index.
    node_map: HashMap<ValueId, NodeIndex>,

    /// Map from value id to the producing instruction.
    instructions: HashMap<ValueId, &'a Instruction>,
}

impl<'a> DefUseGraph<'a> {
    /// Build the graph from a function in a single pass over its
    /// instructions. Operands that reference ids outside the function
    /// (free variables, constants the front-end did not materialize) are
    /// ignored rather than treated as errors.
    pub fn build(func: &'a Function) -> Self {
        let mut inner = DiGraph::new();
        let mut node_map = HashMap::new();
        let mut instructions = HashMap::new();

        for instr in func.instructions() {
            let idx = inner.add_node(instr.id);
            node_map.insert(instr.id, idx);
            instructions.insert(instr.id, instr);
        }

        for instr in func.instructions() {
            let Some(&to) = node_map.get(&instr.id) else {
                continue;
            };
            for (slot, operand) in instr.operands.iter().enumerate() {
                if let Some(&from) = node_map.get(operand) {
                    inner.add_edge(from, to, UseEdge { slot });
                }
            }
        }

        Self {
            inner,
            node_map,
            instructions,
        }
    }

    /// The instruction that produced a value.
    pub fn instruction(&self, id: ValueId) -> Option<&'a Instruction> {
        self.instructions.get(&id).copied()
    }

    /// Every instruction that consumes the value.
    pub fn uses_of(&self, id: ValueId) -> Vec<&'a Instruction> {
        let Some(&node_idx) = self.node_map.get(&id) else {
            return Vec::new();
        };

        self.inner
            .edges_directed(node_idx, petgraph::Direction::Outgoing)
            .filter_map(|edge| {
                let user_id = self.inner.node_weight(edge.target())?;
                self.instructions.get(user_id).copied()
            })
            .collect()
    }

    /// Whether anything consumes the value.
    pub fn is_used(&self, id: ValueId) -> bool {
        let Some(&node_idx) = self.node_map.get(&id) else {
            return false;
        };

        self.inner
            .edges_directed(node_idx, petgraph::Direction::Outgoing)
            .next()
            .is_some()
    }

    /// Number of use sites of the value.
    pub fn use_count(&self, id: ValueId) -> usize {
        let Some(&node_idx) = self.node_map.get(&id) else {
            return 0;
        };

        self.inner
            .edges_directed(node_idx, petgraph::Direction::Outgoing)
            .count()
    }

    /// Number of values in the function.
    pub fn value_count(&self) -> usize {
        self.instructions.len()
    }
}
