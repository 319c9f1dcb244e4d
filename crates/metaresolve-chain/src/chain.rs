//! Ordered repository chain.

use std::sync::Arc;

use tracing::debug;

use metaresolve_repo::Repository;
use metaresolve_types::{
    ArtifactKind, ArtifactRef, DependencyRequest, ResolvedArtifactSet, ResolvedModuleMetadata,
};

use crate::error::{RepositoryAttempt, ResolveError};
use crate::resolvers::{DependencyVersionResolver, ModuleArtifactResolver};

/// An ordered set of repositories consulted for resolution.
///
/// Immutable after construction; safe to share across concurrently running
/// parse operations. Dependency resolution walks repositories in order and
/// the first hit wins (metadata requests are pinned to exact versions, so no
/// conflict arbitration happens here). Artifact resolution consults the
/// repository that resolved the module first, then falls back to the rest of
/// the chain.
pub struct RepositoryChain {
    repositories: Vec<Arc<dyn Repository>>,
}

impl RepositoryChain {
    pub fn new(repositories: Vec<Arc<dyn Repository>>) -> Self {
        Self { repositories }
    }

    pub fn repositories(&self) -> &[Arc<dyn Repository>] {
        &self.repositories
    }

    /// Look up a repository by name.
    pub fn repository(&self, name: &str) -> Option<Arc<dyn Repository>> {
        self.repositories
            .iter()
            .find(|repo| repo.name() == name)
            .cloned()
    }

    /// Repositories with `preferred` (if present) moved to the front.
    fn ordered_from(&self, preferred: &str) -> Vec<Arc<dyn Repository>> {
        let mut ordered: Vec<Arc<dyn Repository>> = Vec::with_capacity(self.repositories.len());
        ordered.extend(
            self.repositories
                .iter()
                .filter(|repo| repo.name() == preferred)
                .cloned(),
        );
        ordered.extend(
            self.repositories
                .iter()
                .filter(|repo| repo.name() != preferred)
                .cloned(),
        );
        ordered
    }
}

impl DependencyVersionResolver for RepositoryChain {
    fn resolve(&self, request: &DependencyRequest) -> Result<ResolvedModuleMetadata, ResolveError> {
        let mut attempts = Vec::new();
        for repo in &self.repositories {
            match repo.resolve_dependency(request) {
                Ok(Some(metadata)) => {
                    debug!(
                        module = %request.requested,
                        repository = repo.name(),
                        "dependency resolved"
                    );
                    return Ok(metadata);
                }
                Ok(None) => attempts.push(RepositoryAttempt::not_found(repo.name())),
                Err(cause) => {
                    debug!(
                        module = %request.requested,
                        repository = repo.name(),
                        error = %cause,
                        "repository probe failed"
                    );
                    attempts.push(RepositoryAttempt::failed(repo.name(), cause));
                }
            }
        }
        Err(ResolveError::UnresolvedModule {
            request: request.requested.clone(),
            attempts,
        })
    }
}

impl ModuleArtifactResolver for RepositoryChain {
    fn resolve_artifacts(
        &self,
        module: &ResolvedModuleMetadata,
        kind: ArtifactKind,
    ) -> Result<ResolvedArtifactSet, ResolveError> {
        let artifact = ArtifactRef::new(module.id.clone(), kind);
        let mut attempts = Vec::new();
        for repo in self.ordered_from(&module.repository) {
            match repo.fetch_artifact(&artifact) {
                Ok(Some(resolved)) => {
                    debug!(
                        artifact = %artifact,
                        repository = repo.name(),
                        file = %resolved.file.display(),
                        "artifact resolved"
                    );
                    let mut set = ResolvedArtifactSet::new();
                    set.insert(resolved);
                    return Ok(set);
                }
                Ok(None) => attempts.push(RepositoryAttempt::not_found(repo.name())),
                Err(cause) => {
                    debug!(
                        artifact = %artifact,
                        repository = repo.name(),
                        error = %cause,
                        "artifact fetch failed"
                    );
                    attempts.push(RepositoryAttempt::failed(repo.name(), cause));
                }
            }
        }
        Err(ResolveError::ArtifactResolution {
            module: module.id.clone(),
            kind,
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaresolve_repo::testing::InMemoryRepository;
    use metaresolve_types::ModuleVersionId;

    fn module() -> ModuleVersionId {
        ModuleVersionId::new("org.example", "widget", "1.0")
    }

    fn descriptor() -> ArtifactRef {
        ArtifactRef::descriptor(module())
    }

    #[test]
    fn first_repository_hit_wins() {
        let first = Arc::new(InMemoryRepository::new("first"));
        let second = Arc::new(InMemoryRepository::new("second"));
        first.publish(descriptor(), "/first/widget-1.0.module");
        second.publish(descriptor(), "/second/widget-1.0.module");

        let chain = RepositoryChain::new(vec![first.clone(), second.clone()]);
        let metadata = chain.resolve(&DependencyRequest::pinned(module())).unwrap();

        assert_eq!(metadata.repository, "first");
        // The walk stops at the first hit.
        assert!(second.calls().is_empty());
    }

    #[test]
    fn unresolved_module_records_every_attempt() {
        let empty = Arc::new(InMemoryRepository::new("empty"));
        let broken = Arc::new(InMemoryRepository::new("broken"));
        broken.fail_with("connection refused");

        let chain = RepositoryChain::new(vec![empty, broken]);
        let error = chain
            .resolve(&DependencyRequest::pinned(module()))
            .unwrap_err();

        match &error {
            ResolveError::UnresolvedModule { request, attempts } => {
                assert_eq!(*request, module());
                assert_eq!(attempts.len(), 2);
                assert!(attempts[0].cause.is_none());
                assert!(attempts[1].cause.is_some());
            }
            other => panic!("expected UnresolvedModule, got {}", other),
        }
    }

    #[test]
    fn artifact_resolution_prefers_originating_repository() {
        let near = Arc::new(InMemoryRepository::new("near"));
        let far = Arc::new(InMemoryRepository::new("far"));
        near.publish(descriptor(), "/near/widget-1.0.module");
        far.publish(descriptor(), "/far/widget-1.0.module");

        // "far" resolved the module even though it sits later in the chain.
        let chain = RepositoryChain::new(vec![near.clone(), far]);
        let metadata = ResolvedModuleMetadata {
            id: module(),
            repository: "far".to_string(),
            artifacts: vec![descriptor()],
        };

        let set = chain
            .resolve_artifacts(&metadata, ArtifactKind::Descriptor)
            .unwrap();
        let file = set.first_file().unwrap();
        assert!(file.starts_with("/far"));
        assert!(near.calls().is_empty());
    }

    #[test]
    fn artifact_resolution_falls_back_across_the_chain() {
        let origin = Arc::new(InMemoryRepository::new("origin"));
        let fallback = Arc::new(InMemoryRepository::new("fallback"));
        // The origin lost the artifact after resolving the module.
        fallback.publish(descriptor(), "/fallback/widget-1.0.module");

        let chain = RepositoryChain::new(vec![origin, fallback]);
        let metadata = ResolvedModuleMetadata {
            id: module(),
            repository: "origin".to_string(),
            artifacts: vec![descriptor()],
        };

        let set = chain
            .resolve_artifacts(&metadata, ArtifactKind::Descriptor)
            .unwrap();
        assert!(set.first_file().unwrap().starts_with("/fallback"));
    }

    #[test]
    fn artifact_resolution_failure_carries_kind_and_attempts() {
        let origin = Arc::new(InMemoryRepository::new("origin"));
        let chain = RepositoryChain::new(vec![origin]);
        let metadata = ResolvedModuleMetadata {
            id: module(),
            repository: "origin".to_string(),
            artifacts: vec![],
        };

        let error = chain
            .resolve_artifacts(&metadata, ArtifactKind::Library)
            .unwrap_err();
        match error {
            ResolveError::ArtifactResolution { kind, attempts, .. } => {
                assert_eq!(kind, ArtifactKind::Library);
                assert_eq!(attempts.len(), 1);
            }
            other => panic!("expected ArtifactResolution, got {}", other),
        }
    }

    #[test]
    fn repository_lookup_by_name() {
        let local = Arc::new(InMemoryRepository::new("local"));
        let chain = RepositoryChain::new(vec![local]);
        assert!(chain.repository("local").is_some());
        assert!(chain.repository("missing").is_none());
    }
}
