//! Test doubles for repository backends.
//!
//! Provides an in-memory [`Repository`] with call recording and error
//! injection, so chain and context behavior can be tested without touching
//! the filesystem or the network.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use parking_lot::Mutex;

use metaresolve_types::{
    ArtifactRef, DependencyRequest, ResolvedArtifact, ResolvedModuleMetadata,
};

use crate::repository::Repository;

/// In-memory repository backed by a map from artifact refs to file paths.
///
/// Every trait call is appended to an internal log in the form
/// `"<op> <argument>"` (e.g., `"exists org.example:widget:1.0 (descriptor)"`).
/// `fail_with` makes every subsequent call error, for failure-path tests.
pub struct InMemoryRepository {
    name: String,
    artifacts: Mutex<HashMap<ArtifactRef, PathBuf>>,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
}

impl InMemoryRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifacts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Register an artifact with the local file path a fetch should return.
    pub fn publish(&self, artifact: ArtifactRef, file: impl Into<PathBuf>) {
        self.artifacts.lock().insert(artifact, file.into());
    }

    /// Make every subsequent call fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    /// Calls recorded so far, oldest first.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().push(call);
        match self.failure.lock().as_ref() {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

impl Repository for InMemoryRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_dependency(
        &self,
        request: &DependencyRequest,
    ) -> Result<Option<ResolvedModuleMetadata>> {
        self.record(format!("resolve {}", request.requested))?;
        let artifacts: Vec<ArtifactRef> = self
            .artifacts
            .lock()
            .keys()
            .filter(|artifact| artifact.module == request.requested)
            .cloned()
            .collect();
        if artifacts.is_empty() {
            return Ok(None);
        }
        Ok(Some(ResolvedModuleMetadata {
            id: request.requested.clone(),
            repository: self.name.clone(),
            artifacts,
        }))
    }

    fn fetch_artifact(&self, artifact: &ArtifactRef) -> Result<Option<ResolvedArtifact>> {
        self.record(format!("fetch {}", artifact))?;
        Ok(self.artifacts.lock().get(artifact).map(|file| ResolvedArtifact {
            kind: artifact.kind,
            file: file.clone(),
            repository: self.name.clone(),
        }))
    }

    fn artifact_exists(&self, artifact: &ArtifactRef) -> Result<bool> {
        self.record(format!("exists {}", artifact))?;
        Ok(self.artifacts.lock().contains_key(artifact))
    }
}
