//! Scoped resolution context for descriptor parsing.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use metaresolve_repo::Repository;
use metaresolve_types::{
    ArtifactKind, ArtifactRef, DependencyRequest, LocalResource, ModuleVersionId,
};

use crate::chain::RepositoryChain;
use crate::error::ResolveError;
use crate::resolvers::{DependencyVersionResolver, ModuleArtifactResolver};

/// Controls the scope of repository searches carried out while a module
/// descriptor is being parsed.
///
/// Existence checks for artifacts of the currently parsing module are scoped
/// to the repository the module was resolved from; consulting the rest of the
/// chain there would be redundant and could return false positives from
/// unrelated repositories hosting a same-named artifact. Metadata fetches for
/// related modules (parents, imports, extensions) go through the full chain,
/// whether or not they reference the current revision.
///
/// One context serves one descriptor-parse operation. The current revision is
/// fixed at construction and the context holds no other state; every
/// `metadata_file` call is a fresh two-stage pipeline with no retries at this
/// layer.
pub struct DescriptorParseContext {
    dependency_resolver: Arc<dyn DependencyVersionResolver>,
    artifact_resolver: Arc<dyn ModuleArtifactResolver>,
    origin: Arc<dyn Repository>,
    current_revision: ModuleVersionId,
}

impl DescriptorParseContext {
    /// Create a context over a repository chain.
    ///
    /// `origin` is the repository through which `current_revision` was
    /// resolved; it alone answers existence checks.
    pub fn new(
        chain: Arc<RepositoryChain>,
        origin: Arc<dyn Repository>,
        current_revision: ModuleVersionId,
    ) -> Self {
        Self::with_resolvers(chain.clone(), chain, origin, current_revision)
    }

    /// Create a context with explicit stage resolvers.
    pub fn with_resolvers(
        dependency_resolver: Arc<dyn DependencyVersionResolver>,
        artifact_resolver: Arc<dyn ModuleArtifactResolver>,
        origin: Arc<dyn Repository>,
        current_revision: ModuleVersionId,
    ) -> Self {
        Self {
            dependency_resolver,
            artifact_resolver,
            origin,
            current_revision,
        }
    }

    /// The module whose descriptor is presently being parsed.
    pub fn current_revision(&self) -> &ModuleVersionId {
        &self.current_revision
    }

    /// Check whether an artifact of the current module exists.
    ///
    /// Delegates only to the originating repository, never the chain; the
    /// repository's answer (and any error) is propagated unchanged.
    pub fn artifact_exists(&self, artifact: &ArtifactRef) -> Result<bool> {
        self.origin.artifact_exists(artifact)
    }

    /// Resolve and return the metadata descriptor file for `target`.
    ///
    /// Two blocking stages: the chain's dependency resolver pins the exact
    /// requested version, then its artifact resolver fetches the descriptor
    /// artifact of the resolved module. A failure in either stage is
    /// surfaced as-is; stage 3 is never attempted after a stage-2 failure.
    ///
    /// # Panics
    ///
    /// Panics if the artifact resolver reports success with an empty result
    /// set. That is a broken collaborator contract, not a resolution
    /// failure.
    pub fn metadata_file(&self, target: &ModuleVersionId) -> Result<LocalResource, ResolveError> {
        debug!(
            current = %self.current_revision,
            target = %target,
            "resolving metadata descriptor"
        );
        let request = DependencyRequest::pinned(target.clone());
        let metadata = self.dependency_resolver.resolve(&request)?;
        let artifacts = self
            .artifact_resolver
            .resolve_artifacts(&metadata, ArtifactKind::Descriptor)?;
        let file = artifacts.first_file().unwrap_or_else(|| {
            panic!(
                "artifact resolver reported success but returned no artifacts for {}",
                metadata.id
            )
        });
        Ok(LocalResource::from_file(file))
    }
}
