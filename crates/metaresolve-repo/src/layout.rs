//! Path utilities for the repository directory layout.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use metaresolve_types::{ArtifactRef, ModuleVersionId};

/// Relative path of a module version's directory:
/// `<group-as-path>/<name>/<version>`.
pub fn module_dir(module: &ModuleVersionId) -> PathBuf {
    Path::new(&module.group_path())
        .join(&module.name)
        .join(&module.version)
}

/// Relative path of an artifact file within a repository root.
pub fn artifact_rel_path(artifact: &ArtifactRef) -> PathBuf {
    module_dir(&artifact.module).join(artifact.file_name())
}

/// Full filesystem path of an artifact under `root`.
pub fn artifact_path(root: &Path, artifact: &ArtifactRef) -> PathBuf {
    root.join(artifact_rel_path(artifact))
}

/// URL path of an artifact under a repository base URL.
pub fn artifact_url(base_url: &str, artifact: &ArtifactRef) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        artifact.module.group_path(),
        artifact.module.name,
        artifact.module.version,
        artifact.file_name()
    )
}

/// Ensure all parent directories exist for a path.
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Write a file atomically (write to .tmp, then rename).
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    ensure_parent_dirs(path)?;
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|s| s.to_str()).unwrap_or("tmp")
    ));
    std::fs::write(&tmp_path, contents)
        .map_err(|e| anyhow!("Failed to write temp file {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|e| anyhow!("Failed to rename {} to {}: {}", tmp_path.display(), path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaresolve_types::{ArtifactKind, ModuleVersionId};
    use tempfile::TempDir;

    fn descriptor_ref() -> ArtifactRef {
        ArtifactRef::descriptor(ModuleVersionId::new("org.example", "widget", "1.0"))
    }

    #[test]
    fn artifact_rel_path_layout() {
        assert_eq!(
            artifact_rel_path(&descriptor_ref()),
            Path::new("org/example/widget/1.0/widget-1.0.module")
        );
    }

    #[test]
    fn artifact_url_strips_trailing_slash() {
        let url = artifact_url("https://repo.example.com/m2/", &descriptor_ref());
        assert_eq!(
            url,
            "https://repo.example.com/m2/org/example/widget/1.0/widget-1.0.module"
        );
    }

    #[test]
    fn library_path_uses_lib_extension() {
        let artifact = ArtifactRef::new(
            ModuleVersionId::new("org.example", "widget", "1.0"),
            ArtifactKind::Library,
        );
        assert_eq!(
            artifact_rel_path(&artifact),
            Path::new("org/example/widget/1.0/widget-1.0.lib")
        );
    }

    #[test]
    fn atomic_write_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c.module");
        atomic_write(&path, b"contents").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"contents");
        // No leftover temp file.
        assert!(!path.with_extension("module.tmp").exists());
    }
}
