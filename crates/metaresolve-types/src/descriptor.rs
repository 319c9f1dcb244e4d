//! JSON module descriptor shape.
//!
//! The resolution core treats descriptor contents as opaque; this shape
//! exists for callers that walk descriptor relationships (the CLI's
//! `--follow-parents` mode). Parsing stays out of the resolution chain.

use serde::{Deserialize, Serialize};

use crate::ids::ModuleVersionId;

/// A declared dependency inside a module descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDecl {
    pub module: ModuleVersionId,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub changing: bool,
}

/// A module metadata descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Coordinates of the module this descriptor describes.
    pub id: ModuleVersionId,
    /// Module whose descriptor this one extends (parent), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<ModuleVersionId>,
    /// Declared dependencies.
    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,
}

impl ModuleDescriptor {
    pub fn new(id: ModuleVersionId) -> Self {
        Self {
            id,
            extends: None,
            dependencies: Vec::new(),
        }
    }
}
