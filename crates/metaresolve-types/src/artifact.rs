//! Artifact references and resolution outcomes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ids::ModuleVersionId;

/// The kind of artifact a repository publishes for a module version.
///
/// Closed set: the resolution machinery only ever distinguishes the metadata
/// descriptor from everything else. `Ord` keeps artifact sets deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The component metadata descriptor (the file describing dependencies).
    Descriptor,
    /// The module's primary binary artifact.
    Library,
}

impl ArtifactKind {
    /// File extension used by repository layouts for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Descriptor => "module",
            ArtifactKind::Library => "lib",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Descriptor => write!(f, "descriptor"),
            ArtifactKind::Library => write!(f, "library"),
        }
    }
}

/// Names one artifact of one module version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub module: ModuleVersionId,
    pub kind: ArtifactKind,
}

impl ArtifactRef {
    pub fn new(module: ModuleVersionId, kind: ArtifactKind) -> Self {
        Self { module, kind }
    }

    /// The metadata descriptor artifact of `module`.
    pub fn descriptor(module: ModuleVersionId) -> Self {
        Self::new(module, ArtifactKind::Descriptor)
    }

    /// Conventional file name: `name-version.ext`.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.module.name,
            self.module.version,
            self.kind.extension()
        )
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.module, self.kind)
    }
}

/// One artifact file materialized on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    /// Artifact kind this file satisfies.
    pub kind: ArtifactKind,
    /// Local path to the file (inside a repository directory or a download
    /// cache).
    pub file: PathBuf,
    /// Name of the repository the file came from.
    pub repository: String,
}

/// Per-kind resolved artifact results.
///
/// Modeled as possibly plural per kind, though metadata lookups expect
/// exactly one entry. Iteration order is deterministic (`BTreeMap`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedArtifactSet {
    results: BTreeMap<ArtifactKind, Vec<ResolvedArtifact>>,
}

impl ResolvedArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, artifact: ResolvedArtifact) {
        self.results.entry(artifact.kind).or_default().push(artifact);
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The file of the first entry in kind order, if any.
    pub fn first_file(&self) -> Option<&Path> {
        self.results
            .values()
            .flat_map(|artifacts| artifacts.iter())
            .map(|artifact| artifact.file.as_path())
            .next()
    }

    pub fn results(&self) -> &BTreeMap<ArtifactKind, Vec<ResolvedArtifact>> {
        &self.results
    }
}

/// A locally materialized file plus its canonical origin location.
///
/// Returned to descriptor parsers; never cached or retained by the resolution
/// machinery beyond the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalResource {
    /// Absolute path to the local file.
    pub file: PathBuf,
    /// Canonical `file://` URI derived from the absolute path.
    pub uri: String,
}

impl LocalResource {
    /// Wrap a local file, absolutizing relative paths against the current
    /// working directory.
    pub fn from_file(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let absolute = if file.is_absolute() {
            file
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&file))
                .unwrap_or(file)
        };
        let uri = format!("file://{}", absolute.display());
        Self {
            file: absolute,
            uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> ModuleVersionId {
        ModuleVersionId::new("org.example", "widget", "1.0")
    }

    #[test]
    fn descriptor_file_name() {
        let artifact = ArtifactRef::descriptor(module());
        assert_eq!(artifact.file_name(), "widget-1.0.module");
    }

    #[test]
    fn library_file_name() {
        let artifact = ArtifactRef::new(module(), ArtifactKind::Library);
        assert_eq!(artifact.file_name(), "widget-1.0.lib");
    }

    #[test]
    fn artifact_set_first_file_follows_kind_order() {
        let mut set = ResolvedArtifactSet::new();
        set.insert(ResolvedArtifact {
            kind: ArtifactKind::Library,
            file: PathBuf::from("/repo/widget-1.0.lib"),
            repository: "main".to_string(),
        });
        set.insert(ResolvedArtifact {
            kind: ArtifactKind::Descriptor,
            file: PathBuf::from("/repo/widget-1.0.module"),
            repository: "main".to_string(),
        });

        // Descriptor sorts before Library.
        assert_eq!(
            set.first_file(),
            Some(Path::new("/repo/widget-1.0.module"))
        );
    }

    #[test]
    fn empty_artifact_set() {
        let set = ResolvedArtifactSet::new();
        assert!(set.is_empty());
        assert_eq!(set.first_file(), None);
    }

    #[test]
    fn local_resource_uri_from_absolute_path() {
        let resource = LocalResource::from_file("/tmp/widget-1.0.module");
        assert_eq!(resource.file, PathBuf::from("/tmp/widget-1.0.module"));
        assert_eq!(resource.uri, "file:///tmp/widget-1.0.module");
    }

    #[test]
    fn local_resource_absolutizes_relative_paths() {
        let resource = LocalResource::from_file("widget-1.0.module");
        assert!(resource.file.is_absolute());
        assert!(resource.uri.starts_with("file:///"));
        assert!(resource.uri.ends_with("widget-1.0.module"));
    }
}
