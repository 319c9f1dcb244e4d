//! Module metadata resolution CLI.
//!
//! Resolves the metadata descriptor of a module version through an ordered
//! chain of repositories, and optionally walks the descriptor's `extends`
//! chain the way a descriptor parser would: each hop goes through a
//! [`DescriptorParseContext`] scoped to the module being parsed.
//!
//! ```text
//! metaresolve org.example:widget:1.0 \
//!     --repo /var/repos/local \
//!     --repo https://repo.example.com/m2 \
//!     --follow-parents
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;

use metaresolve_chain::{DependencyVersionResolver, DescriptorParseContext, RepositoryChain};
use metaresolve_repo::{FsRepository, HttpRepository, Repository};
use metaresolve_types::env_utils::env_var;
use metaresolve_types::{
    DependencyRequest, LocalResource, ModuleDescriptor, ModuleVersionId,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Module coordinate: group:name:version.
    module: String,

    /// Repository root: a local directory or an http(s) URL. Can be given
    /// multiple times; order defines search order.
    #[arg(long = "repo", value_name = "DIR_OR_URL", required = true)]
    repos: Vec<String>,

    /// Download cache directory for HTTP repositories.
    /// Defaults to `~/.metaresolve/cache` (or `METARESOLVE_CACHE_DIR`).
    #[arg(long, value_name = "PATH")]
    cache_dir: Option<PathBuf>,

    /// Follow the descriptor's `extends` chain and resolve each parent.
    #[arg(long)]
    follow_parents: bool,

    /// Write the JSON report to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    emit_json: Option<PathBuf>,
}

/// One resolved descriptor in the report.
#[derive(Debug, Serialize)]
struct DescriptorEntry {
    module: String,
    repository: String,
    file: PathBuf,
    uri: String,
}

#[derive(Debug, Serialize)]
struct Report {
    requested: DescriptorEntry,
    parents: Vec<DescriptorEntry>,
}

fn default_cache_dir() -> PathBuf {
    match env_var::<PathBuf>("METARESOLVE_CACHE_DIR") {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".metaresolve")
            .join("cache"),
    }
}

fn build_repository(location: &str, index: usize, cache_dir: &Path) -> Result<Arc<dyn Repository>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let name = format!("remote-{}", index);
        let repo = HttpRepository::new(name.clone(), location, cache_dir.join(&name))
            .with_context(|| format!("Failed to set up HTTP repository '{}'", location))?;
        Ok(Arc::new(repo))
    } else {
        let repo = FsRepository::new(format!("local-{}", index), location)
            .with_context(|| format!("Failed to open repository directory '{}'", location))?;
        Ok(Arc::new(repo))
    }
}

/// Resolve one module's descriptor through a parse context scoped to it.
///
/// Returns the originating repository name and the local descriptor resource.
fn resolve_descriptor(
    chain: &Arc<RepositoryChain>,
    module: &ModuleVersionId,
) -> Result<(String, LocalResource)> {
    let metadata = chain.resolve(&DependencyRequest::pinned(module.clone()))?;
    let origin = chain.repository(&metadata.repository).ok_or_else(|| {
        anyhow!(
            "repository '{}' resolved '{}' but is not in the chain",
            metadata.repository,
            module
        )
    })?;
    let context = DescriptorParseContext::new(chain.clone(), origin, module.clone());
    let resource = context.metadata_file(module)?;
    Ok((metadata.repository, resource))
}

fn parse_descriptor(resource: &LocalResource) -> Result<ModuleDescriptor> {
    let raw = std::fs::read_to_string(&resource.file)
        .with_context(|| format!("Failed to read descriptor {}", resource.file.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid descriptor JSON in {}", resource.file.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let module: ModuleVersionId = args.module.parse()?;
    let cache_dir = args.cache_dir.clone().unwrap_or_else(default_cache_dir);

    let repositories = args
        .repos
        .iter()
        .enumerate()
        .map(|(index, location)| build_repository(location, index, &cache_dir))
        .collect::<Result<Vec<_>>>()?;
    let chain = Arc::new(RepositoryChain::new(repositories));

    let (repository, resource) = resolve_descriptor(&chain, &module)?;
    let requested = DescriptorEntry {
        module: module.to_string(),
        repository,
        file: resource.file.clone(),
        uri: resource.uri.clone(),
    };

    let mut parents = Vec::new();
    if args.follow_parents {
        let mut visited: HashSet<ModuleVersionId> = HashSet::new();
        visited.insert(module.clone());

        let mut descriptor = parse_descriptor(&resource)?;
        while let Some(parent) = descriptor.extends.clone() {
            if !visited.insert(parent.clone()) {
                return Err(anyhow!(
                    "descriptor extends cycle detected at '{}'",
                    parent
                ));
            }
            let (repository, resource) = resolve_descriptor(&chain, &parent)?;
            parents.push(DescriptorEntry {
                module: parent.to_string(),
                repository,
                file: resource.file.clone(),
                uri: resource.uri.clone(),
            });
            descriptor = parse_descriptor(&resource)?;
        }
    }

    let report = Report { requested, parents };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    match &args.emit_json {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_dir_env_override_wins() {
        std::env::set_var("METARESOLVE_CACHE_DIR", "/tmp/metaresolve-cache-test");
        assert_eq!(
            default_cache_dir(),
            PathBuf::from("/tmp/metaresolve-cache-test")
        );

        // An empty override falls back to the home-relative default.
        std::env::set_var("METARESOLVE_CACHE_DIR", "");
        assert!(default_cache_dir().ends_with(".metaresolve/cache"));
        std::env::remove_var("METARESOLVE_CACHE_DIR");
    }
}
