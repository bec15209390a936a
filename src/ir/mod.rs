//! SSA export data model.
//!
//! The analyzer does not parse Go source. An external front-end compiles
//! each package to SSA form and serializes one JSON document per
//! compilation unit (a `*.ssa.json` export). This module is the typed
//! contract for that document: the unit's type table, its functions as
//! blocks of instructions, and the comment text of each source file
//! keyed by line number.
//!
//! Instruction ids double as SSA value ids: the instruction that produces
//! a value *is* that value, and `operands` entries refer to producer ids.

// IR model - some accessors reserved for future use
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// SSA value identity within one function.
pub type ValueId = u32;

/// Entry in the unit's type table.
pub type TypeId = u32;

/// Errors raised while loading an SSA export.
#[derive(Error, Debug)]
pub enum IrError {
    #[error("failed to read SSA export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse SSA export: {0}")]
    Json(#[from] serde_json::Error),
}

/// One compilation unit as exported by the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Import path of the unit, e.g. "github.com/acme/orders".
    pub name: String,

    /// Flat table of every type referenced by the unit's instructions.
    #[serde(default)]
    pub types: Vec<TypeRef>,

    /// All source functions of the unit, methods included.
    #[serde(default)]
    pub functions: Vec<Function>,

    /// Comment text per source file, for suppression-directive scanning.
    #[serde(default)]
    pub files: Vec<FileComments>,
}

impl Unit {
    /// Load a unit from an export file on disk.
    pub fn from_json_file(path: &Path) -> Result<Self, IrError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Parse a unit from an in-memory export document.
    pub fn from_json_str(contents: &str) -> Result<Self, IrError> {
        Ok(serde_json::from_str(contents)?)
    }
}

/// A named entry in the type table.
///
/// Pointer entries have `kind == Pointer` and point at their pointee via
/// `elem`; named entries carry the declaring package's import path so
/// lookups can be nominal rather than structural.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: TypeId,

    /// Type name within its package, e.g. "RowIterator". Pointer and
    /// tuple entries use whatever display string the front-end emits.
    pub name: String,

    /// Import path of the declaring package; absent for builtins and
    /// synthetic types (pointers, tuples).
    #[serde(default)]
    pub package: Option<String>,

    pub kind: TypeKind,

    /// Pointee for `Pointer` entries.
    #[serde(default)]
    pub elem: Option<TypeId>,
}

/// Structural kind of a type-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Named,
    Pointer,
    Tuple,
    Basic,
    Slice,
    Map,
    Chan,
    Func,
    Interface,
    Struct,
}

/// A single function body in SSA form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    /// Qualified name, e.g. "(*OrderService).FetchAll".
    pub name: String,

    /// Bare name, e.g. "FetchAll".
    pub short_name: String,

    /// Path of the file that defines this function.
    pub file: String,

    #[serde(default)]
    pub is_method: bool,

    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Function {
    /// Iterate every instruction across all blocks, in document order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.blocks.iter().flat_map(|b| b.instructions.iter())
    }
}

/// A basic block. Block structure is preserved from the front-end but the
/// analysis is a linear scan; successor edges are not part of the export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

/// One SSA instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    /// Value id produced by this instruction. Unique within the function.
    pub id: ValueId,

    pub kind: OpKind,

    /// Value ids consumed by this instruction. For method calls the
    /// receiver is operand 0; for `Extract` operand 0 is the multi-result
    /// call; for `Return` the operands are the returned values.
    #[serde(default)]
    pub operands: Vec<ValueId>,

    /// Type of the produced value; absent for instructions that produce
    /// nothing (defer, return, store).
    #[serde(default)]
    pub type_id: Option<TypeId>,

    /// Callee name for `Call`, `Defer` and `Go`: the bare method name for
    /// method calls, the function name otherwise.
    #[serde(default)]
    pub callee: Option<String>,

    /// True when the callee is invoked on a receiver, whether through an
    /// interface or on a concrete type.
    #[serde(default)]
    pub is_method_call: bool,

    /// Component index for `Extract`.
    #[serde(default)]
    pub index: Option<u32>,

    /// Source position of this instruction; absent for synthetic
    /// instructions the front-end could not attribute.
    #[serde(default)]
    pub span: Option<Span>,
}

impl Instruction {
    /// Receiver of a method call, if this is one.
    pub fn receiver(&self) -> Option<ValueId> {
        if self.is_method_call {
            self.operands.first().copied()
        } else {
            None
        }
    }
}

/// Operation kinds. Only a handful matter to the coverage algorithm
/// (call, defer, extract, return); the rest exist so exports round-trip
/// and so value-producing instructions of any kind can become candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Call,
    Defer,
    Go,
    Extract,
    Return,
    Store,
    Alloc,
    FieldAddr,
    Load,
    Parameter,
    Phi,
    MakeClosure,
    Other,
}

/// Source position of an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub file: String,
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column.
    pub column: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Comment text of one source file, line-indexed by the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileComments {
    pub path: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A single comment. `text` is the raw comment including its `//` or
/// `/*` markers; `line` is the 1-indexed line where the comment starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub line: usize,
    pub text: String,
}
