//! Blocking HTTP repository.

use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

use metaresolve_types::{
    ArtifactKind, ArtifactRef, DependencyRequest, ResolvedArtifact, ResolvedModuleMetadata,
};

use crate::cache::{CachedArtifactMeta, DownloadCache};
use crate::layout::artifact_url;
use crate::repository::Repository;

/// Cap on a single artifact download. Metadata descriptors are small; this
/// guards against a misbehaving server streaming forever.
const MAX_ARTIFACT_BYTES: u64 = 64 * 1024 * 1024;

/// A repository served over HTTP(S).
///
/// Existence and resolution use HEAD requests; fetches GET into a local
/// [`DownloadCache`]. When the server publishes a `.sha256` sibling, the
/// downloaded bytes are verified against it before being cached.
pub struct HttpRepository {
    name: String,
    base_url: String,
    agent: ureq::Agent,
    cache: DownloadCache,
}

impl HttpRepository {
    /// Create a repository client for `base_url`, caching downloads under
    /// `cache_root`.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        cache_root: impl AsRef<Path>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            base_url: base_url.into(),
            agent: ureq::Agent::new(),
            cache: DownloadCache::new(cache_root)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// HEAD an artifact URL. `Ok(false)` for 404, errors otherwise.
    fn head_exists(&self, artifact: &ArtifactRef) -> Result<bool> {
        let url = artifact_url(&self.base_url, artifact);
        match self.agent.head(&url).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(e) => Err(anyhow!("HEAD {} failed: {}", url, e)),
        }
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| anyhow!("GET {} failed: {}", url, e))?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_ARTIFACT_BYTES)
            .read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read response body from {}", url))?;
        Ok(bytes)
    }

    /// Fetch the published `.sha256` sibling, if the server has one.
    fn expected_checksum(&self, url: &str) -> Result<Option<String>> {
        let checksum_url = format!("{}.sha256", url);
        match self.agent.get(&checksum_url).call() {
            Ok(response) => {
                let body = response
                    .into_string()
                    .with_context(|| format!("Failed to read checksum from {}", checksum_url))?;
                Ok(parse_checksum(&body))
            }
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(e) => Err(anyhow!("GET {} failed: {}", checksum_url, e)),
        }
    }
}

/// Parse a checksum file body: the first whitespace-separated token, if it
/// looks like hex. Tolerates the common `<hex>  <filename>` format.
fn parse_checksum(body: &str) -> Option<String> {
    let token = body.split_whitespace().next()?;
    let token = token.to_ascii_lowercase();
    (!token.is_empty() && token.chars().all(|c| c.is_ascii_hexdigit())).then_some(token)
}

impl Repository for HttpRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_dependency(
        &self,
        request: &DependencyRequest,
    ) -> Result<Option<ResolvedModuleMetadata>> {
        let descriptor = ArtifactRef::descriptor(request.requested.clone());
        if !self.head_exists(&descriptor)? {
            debug!(
                repository = %self.name,
                module = %request.requested,
                "module not present"
            );
            return Ok(None);
        }

        let mut artifacts = vec![descriptor];
        let library = ArtifactRef::new(request.requested.clone(), ArtifactKind::Library);
        if self.head_exists(&library)? {
            artifacts.push(library);
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
        if let Some(file) = self.cache.get(artifact) {
            debug!(repository = %self.name, artifact = %artifact, "cache hit");
            return Ok(Some(ResolvedArtifact {
                kind: artifact.kind,
                file,
                repository: self.name.clone(),
            }));
        }

        let url = artifact_url(&self.base_url, artifact);
        if !self.head_exists(artifact)? {
            return Ok(None);
        }

        let bytes = self.download(&url)?;
        let actual = hex::encode(Sha256::digest(&bytes));
        if let Some(expected) = self.expected_checksum(&url)? {
            if expected != actual {
                return Err(anyhow!(
                    "Checksum mismatch for {}: expected {}, got {}",
                    url,
                    expected,
                    actual
                ));
            }
        }

        let file = self.cache.put(
            artifact,
            &bytes,
            &CachedArtifactMeta {
                repository: self.name.clone(),
                origin_url: Some(url),
                sha256: actual,
            },
        )?;

        debug!(
            repository = %self.name,
            artifact = %artifact,
            bytes = bytes.len(),
            "downloaded artifact"
        );
        Ok(Some(ResolvedArtifact {
            kind: artifact.kind,
            file,
            repository: self.name.clone(),
        }))
    }

    fn artifact_exists(&self, artifact: &ArtifactRef) -> Result<bool> {
        if self.cache.get(artifact).is_some() {
            return Ok(true);
        }
        self.head_exists(artifact)
    }
}
