//! Directory-backed repository.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use metaresolve_types::{
    ArtifactKind, ArtifactRef, DependencyRequest, ResolvedArtifact, ResolvedModuleMetadata,
};

use crate::layout::{artifact_path, atomic_write};
use crate::repository::Repository;

/// A repository rooted at a local directory.
///
/// Layout: `<root>/<group-as-path>/<name>/<version>/<name>-<version>.<ext>`.
/// Fetches return the repository file path directly; nothing is copied.
pub struct FsRepository {
    name: String,
    root: PathBuf,
}

impl FsRepository {
    /// Open (or create) a repository directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .map_err(|e| anyhow!("Failed to create repository root {}: {}", root.display(), e))?;
        Ok(Self {
            name: name.into(),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an artifact into the repository layout. Used by tests and
    /// fixture setup.
    pub fn publish(&self, artifact: &ArtifactRef, contents: &[u8]) -> Result<PathBuf> {
        let path = artifact_path(&self.root, artifact);
        atomic_write(&path, contents)
            .with_context(|| format!("Failed to publish {} to '{}'", artifact, self.name))?;
        Ok(path)
    }

    fn kinds_present(&self, request: &DependencyRequest) -> Vec<ArtifactRef> {
        [ArtifactKind::Descriptor, ArtifactKind::Library]
            .into_iter()
            .map(|kind| ArtifactRef::new(request.requested.clone(), kind))
            .filter(|artifact| artifact_path(&self.root, artifact).exists())
            .collect()
    }
}

impl Repository for FsRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_dependency(
        &self,
        request: &DependencyRequest,
    ) -> Result<Option<ResolvedModuleMetadata>> {
        let artifacts = self.kinds_present(request);
        if artifacts.is_empty() {
            debug!(
                repository = %self.name,
                module = %request.requested,
                "module not present"
            );
            return Ok(None);
        }

        debug!(
            repository = %self.name,
            module = %request.requested,
            artifacts = artifacts.len(),
            "resolved module"
        );
        Ok(Some(ResolvedModuleMetadata {
            id: request.requested.clone(),
            repository: self.name.clone(),
            artifacts,
        }))
    }

    fn fetch_artifact(&self, artifact: &ArtifactRef) -> Result<Option<ResolvedArtifact>> {
        let path = artifact_path(&self.root, artifact);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(ResolvedArtifact {
            kind: artifact.kind,
            file: path,
            repository: self.name.clone(),
        }))
    }

    fn artifact_exists(&self, artifact: &ArtifactRef) -> Result<bool> {
        Ok(artifact_path(&self.root, artifact).exists())
    }
}
