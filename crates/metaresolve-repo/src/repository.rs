//! Repository backend trait.

use anyhow::Result;
use metaresolve_types::{ArtifactRef, DependencyRequest, ResolvedArtifact, ResolvedModuleMetadata};

/// A single repository backend.
///
/// Implementations are consulted by the repository chain and, for existence
/// checks on the currently parsing module, directly by the descriptor parse
/// context. All calls are blocking; deadlines, if any, are the backend's own
/// concern. Implementations must be safe to share across concurrently
/// running resolve operations.
pub trait Repository: Send + Sync {
    /// Stable name identifying this repository in resolution results.
    fn name(&self) -> &str;

    /// Resolve a dependency request to module metadata.
    ///
    /// Returns `Ok(None)` when this repository does not host the requested
    /// module version. Errors mean the repository could not be consulted and
    /// are propagated unchanged.
    fn resolve_dependency(
        &self,
        request: &DependencyRequest,
    ) -> Result<Option<ResolvedModuleMetadata>>;

    /// Fetch one artifact, materializing it as a local file.
    ///
    /// Returns `Ok(None)` when this repository does not host the artifact.
    fn fetch_artifact(&self, artifact: &ArtifactRef) -> Result<Option<ResolvedArtifact>>;

    /// Check whether an artifact exists, without materializing it.
    fn artifact_exists(&self, artifact: &ArtifactRef) -> Result<bool>;
}
