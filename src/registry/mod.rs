//! Resource type registry.
//!
//! Maps entries of a unit's type table to the descriptor of a leak-prone
//! resource: the handle's display name and the cleanup method a caller is
//! required to defer. The builtin set covers the Cloud Spanner handle
//! types; configuration can register further types from other packages.
//!
//! The registry is built once per compilation unit and is read-only
//! afterwards, so it can be shared freely across parallel per-function
//! scans.

// Registry - some query methods reserved for future use
#![allow(dead_code)]

use crate::ir::{TypeId, TypeKind, Unit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Import path of the package whose types the builtin set covers.
pub const SPANNER_PACKAGE: &str = "cloud.google.com/go/spanner";

/// Lifecycle family of a resource type. Transaction-like handles hold a
/// session until closed; iterator-like handles hold a stream until
/// stopped. The exemption rules differ between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Transaction,
    Iterator,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Transaction => "transaction",
            ResourceKind::Iterator => "iterator",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registration request for one resource type, as written in config
/// files or in the builtin table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Import path of the declaring package.
    pub package: String,
    /// Type name within that package.
    pub name: String,
    /// Method that must be deferred, e.g. "Close".
    pub cleanup_method: String,
    pub kind: ResourceKind,
}

/// Static record binding a resource type to its cleanup obligation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Display name, e.g. "RowIterator".
    pub name: String,
    /// Required cleanup method, e.g. "Stop".
    pub cleanup_method: String,
    pub kind: ResourceKind,
}

impl ResourceDescriptor {
    /// Diagnostic message for an uncovered handle of this type.
    pub fn leak_message(&self) -> String {
        format!("{}.{}() must be deferred", self.name, self.cleanup_method)
    }
}

/// The builtin descriptor set. `ReadWriteTransaction` is deliberately
/// absent: its lifetime is owned by the callback runner, so user code
/// never carries a defer obligation for it.
fn builtin_resources() -> [ResourceSpec; 3] {
    [
        ResourceSpec {
            package: SPANNER_PACKAGE.to_string(),
            name: "ReadOnlyTransaction".to_string(),
            cleanup_method: "Close".to_string(),
            kind: ResourceKind::Transaction,
        },
        ResourceSpec {
            package: SPANNER_PACKAGE.to_string(),
            name: "BatchReadOnlyTransaction".to_string(),
            cleanup_method: "Close".to_string(),
            kind: ResourceKind::Transaction,
        },
        ResourceSpec {
            package: SPANNER_PACKAGE.to_string(),
            name: "RowIterator".to_string(),
            cleanup_method: "Stop".to_string(),
            kind: ResourceKind::Iterator,
        },
    ]
}

/// Mapping from type-table id to resource descriptor for one unit.
///
/// Pointer types are resolved at build time: a `Pointer` entry whose
/// pointee is a registered named type maps to the same descriptor, so
/// lookups strip exactly one level of indirection and no more.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_type: HashMap<TypeId, ResourceDescriptor>,
}

impl TypeRegistry {
    /// Build the registry from a unit's type table. Specs whose type is
    /// not present in the table register nothing; an entirely empty
    /// registry is the normal outcome for units that do not import any
    /// registered package.
    pub fn from_unit(unit: &Unit, extra: &[ResourceSpec]) -> Self {
        let mut named: HashMap<TypeId, ResourceDescriptor> = HashMap::new();

        for spec in builtin_resources().iter().chain(extra.iter()) {
            register(&mut named, unit, spec);
        }

        // Resolve single-level pointers against the named set only, so a
        // pointer-to-pointer never matches.
        let mut by_type = named.clone();
        for t in &unit.types {
            if t.kind != TypeKind::Pointer {
                continue;
            }
            let Some(elem) = t.elem else { continue };
            if let Some(descriptor) = named.get(&elem) {
                by_type.insert(t.id, descriptor.clone());
            }
        }

        if by_type.is_empty() {
            debug!(unit = %unit.name, "no registered resource types; unit will be skipped");
        }

        Self { by_type }
    }

    /// Descriptor for a produced value's type, if it is a registered
    /// resource handle (directly or behind one pointer).
    pub fn lookup(&self, ty: TypeId) -> Option<&ResourceDescriptor> {
        self.by_type.get(&ty)
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }
}

/// Resolve one spec against the unit's type table by nominal identity.
fn register(named: &mut HashMap<TypeId, ResourceDescriptor>, unit: &Unit, spec: &ResourceSpec) {
    for t in &unit.types {
        if t.kind != TypeKind::Named {
            continue;
        }
        if t.name != spec.name {
            continue;
        }
        if t.package.as_deref() != Some(spec.package.as_str()) {
            continue;
        }
        named.insert(
            t.id,
            ResourceDescriptor {
                name: spec.name.clone(),
                cleanup_method: spec.cleanup_method.clone(),
                kind: spec.kind,
            },
        );
    }
}
