//! Dependency resolve requests and their module-level outcomes.

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactRef;
use crate::ids::ModuleVersionId;

/// A dependency resolve request.
///
/// Plain value type with explicit flags; there is no behavioral hierarchy of
/// request kinds. Metadata lookups build a pinned request per call and drop
/// it when the call returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRequest {
    /// The requested module version.
    pub requested: ModuleVersionId,
    /// Must resolve to exactly the requested version, skipping conflict
    /// resolution.
    pub force: bool,
    /// Whether the requested version is expected to change in place
    /// (snapshot semantics).
    pub changing: bool,
}

impl DependencyRequest {
    pub fn new(requested: ModuleVersionId) -> Self {
        Self {
            requested,
            force: false,
            changing: false,
        }
    }

    /// A synthetic request pinned to exactly `requested`: force=true,
    /// changing=false. This is the shape metadata lookups use.
    pub fn pinned(requested: ModuleVersionId) -> Self {
        Self {
            requested,
            force: true,
            changing: false,
        }
    }
}

/// Outcome of resolving a [`DependencyRequest`] to a module.
///
/// Produced by the dependency resolver and consumed immediately by the
/// artifact resolver; not retained between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedModuleMetadata {
    /// Resolved module coordinates.
    pub id: ModuleVersionId,
    /// Name of the repository that resolved the module. Artifact resolution
    /// consults this repository first.
    pub repository: String,
    /// Artifacts the repository advertises for this module version.
    pub artifacts: Vec<ArtifactRef>,
}
