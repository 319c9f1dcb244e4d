//! On-disk cache for downloaded artifact files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use metaresolve_types::ArtifactRef;

use crate::layout::{artifact_rel_path, atomic_write};

/// Metadata stored alongside a cached artifact file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedArtifactMeta {
    /// Repository the artifact was downloaded from.
    pub repository: String,
    /// Origin URL the bytes came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
    /// Hex SHA-256 of the cached bytes.
    pub sha256: String,
}

/// Download cache with the same directory layout as a repository, plus an
/// in-memory path index to skip filesystem probes on repeat lookups.
///
/// Puts are idempotent: an already cached (artifact, file) pair is left in
/// place.
pub struct DownloadCache {
    root: PathBuf,
    index: RwLock<HashMap<ArtifactRef, PathBuf>>,
}

impl DownloadCache {
    /// Open (or create) a cache directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .map_err(|e| anyhow!("Failed to create cache root {}: {}", root.display(), e))?;
        Ok(Self {
            root,
            index: RwLock::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, artifact: &ArtifactRef) -> PathBuf {
        self.root.join("artifacts").join(artifact_rel_path(artifact))
    }

    fn meta_path(&self, artifact: &ArtifactRef) -> PathBuf {
        let file = self.file_path(artifact);
        let name = format!(
            "{}.meta.json",
            file.file_name().and_then(|n| n.to_str()).unwrap_or("artifact")
        );
        file.with_file_name(name)
    }

    /// Path of the cached file for `artifact`, if present.
    pub fn get(&self, artifact: &ArtifactRef) -> Option<PathBuf> {
        if let Some(path) = self.index.read().get(artifact) {
            return Some(path.clone());
        }
        let path = self.file_path(artifact);
        if path.exists() {
            self.index.write().insert(artifact.clone(), path.clone());
            return Some(path);
        }
        None
    }

    /// Metadata of the cached artifact, if present.
    pub fn get_meta(&self, artifact: &ArtifactRef) -> Result<Option<CachedArtifactMeta>> {
        let meta_path = self.meta_path(artifact);
        if !meta_path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&meta_path)
            .map_err(|e| anyhow!("Failed to read cache metadata {}: {}", meta_path.display(), e))?;
        let meta = serde_json::from_str(&raw)
            .map_err(|e| anyhow!("Invalid cache metadata {}: {}", meta_path.display(), e))?;
        Ok(Some(meta))
    }

    /// Store artifact bytes, returning the cached file path.
    pub fn put(
        &self,
        artifact: &ArtifactRef,
        contents: &[u8],
        meta: &CachedArtifactMeta,
    ) -> Result<PathBuf> {
        let path = self.file_path(artifact);
        let meta_path = self.meta_path(artifact);

        if !(path.exists() && meta_path.exists()) {
            atomic_write(&path, contents)?;
            let meta_json = serde_json::to_string_pretty(meta)
                .map_err(|e| anyhow!("Failed to serialize cache metadata: {}", e))?;
            atomic_write(&meta_path, meta_json.as_bytes())?;
        }

        self.index.write().insert(artifact.clone(), path.clone());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaresolve_types::ModuleVersionId;
    use tempfile::TempDir;

    fn descriptor_ref() -> ArtifactRef {
        ArtifactRef::descriptor(ModuleVersionId::new("org.example", "widget", "1.0"))
    }

    fn meta() -> CachedArtifactMeta {
        CachedArtifactMeta {
            repository: "remote".to_string(),
            origin_url: Some("https://repo.example.com/x".to_string()),
            sha256: "ab".repeat(32),
        }
    }

    #[test]
    fn put_and_get() -> Result<()> {
        let tmp = TempDir::new()?;
        let cache = DownloadCache::new(tmp.path())?;
        let artifact = descriptor_ref();

        assert!(cache.get(&artifact).is_none());

        let path = cache.put(&artifact, b"{}", &meta())?;
        assert_eq!(cache.get(&artifact), Some(path.clone()));
        assert_eq!(std::fs::read(&path)?, b"{}");

        let loaded = cache.get_meta(&artifact)?.expect("metadata");
        assert_eq!(loaded.repository, "remote");

        Ok(())
    }

    #[test]
    fn idempotent_put_keeps_first_contents() -> Result<()> {
        let tmp = TempDir::new()?;
        let cache = DownloadCache::new(tmp.path())?;
        let artifact = descriptor_ref();

        let path = cache.put(&artifact, b"first", &meta())?;
        cache.put(&artifact, b"second", &meta())?;
        assert_eq!(std::fs::read(&path)?, b"first");

        Ok(())
    }

    #[test]
    fn index_survives_reopen_via_filesystem_probe() -> Result<()> {
        let tmp = TempDir::new()?;
        let artifact = descriptor_ref();
        {
            let cache = DownloadCache::new(tmp.path())?;
            cache.put(&artifact, b"{}", &meta())?;
        }
        let cache = DownloadCache::new(tmp.path())?;
        assert!(cache.get(&artifact).is_some());
        Ok(())
    }
}
