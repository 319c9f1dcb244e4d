//! Resolver trait seams.
//!
//! These traits let a parse context consume the two resolution stages
//! without coupling to the concrete [`RepositoryChain`](crate::chain::RepositoryChain),
//! so tests can substitute doubles for either stage independently.

use metaresolve_types::{
    ArtifactKind, DependencyRequest, ResolvedArtifactSet, ResolvedModuleMetadata,
};

use crate::error::ResolveError;

/// Stage 2: resolve a dependency request to module metadata.
pub trait DependencyVersionResolver: Send + Sync {
    /// Resolve `request` to a module, or report which repositories were
    /// tried and why each came up empty.
    fn resolve(&self, request: &DependencyRequest) -> Result<ResolvedModuleMetadata, ResolveError>;
}

/// Stage 3: resolve a module's artifacts of one kind to local files.
pub trait ModuleArtifactResolver: Send + Sync {
    /// Fetch the `kind` artifacts of `module`. A successful result is
    /// guaranteed non-empty by the contract; callers treat an empty set as a
    /// collaborator bug.
    fn resolve_artifacts(
        &self,
        module: &ResolvedModuleMetadata,
        kind: ArtifactKind,
    ) -> Result<ResolvedArtifactSet, ResolveError>;
}
