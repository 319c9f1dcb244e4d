//! Resolution failure taxonomy.
//!
//! Two failure shapes, one per pipeline stage. The chain never retries and
//! never swallows a backend error; each failed or empty repository probe is
//! recorded as an attempt and surfaced to the caller verbatim.

use std::fmt;

use metaresolve_types::{ArtifactKind, ModuleVersionId};

/// One repository's contribution to a failed resolve.
#[derive(Debug)]
pub struct RepositoryAttempt {
    /// Name of the repository consulted.
    pub repository: String,
    /// The backend error, or `None` when the repository cleanly reported
    /// "not found".
    pub cause: Option<anyhow::Error>,
}

impl RepositoryAttempt {
    /// The repository answered but did not host the module/artifact.
    pub fn not_found(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            cause: None,
        }
    }

    /// The repository could not be consulted.
    pub fn failed(repository: impl Into<String>, cause: anyhow::Error) -> Self {
        Self {
            repository: repository.into(),
            cause: Some(cause),
        }
    }
}

impl fmt::Display for RepositoryAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "'{}' ({})", self.repository, cause),
            None => write!(f, "'{}' (not found)", self.repository),
        }
    }
}

/// A resolution failure, distinguishing which pipeline stage failed.
#[derive(Debug)]
pub enum ResolveError {
    /// Stage-2 failure: no repository in the chain could resolve the
    /// requested module version.
    UnresolvedModule {
        /// The module that was requested.
        request: ModuleVersionId,
        /// Per-repository outcomes, in consultation order.
        attempts: Vec<RepositoryAttempt>,
    },

    /// Stage-3 failure: the module resolved, but the requested artifact could
    /// not be fetched from any repository.
    ArtifactResolution {
        /// The module whose artifact was requested.
        module: ModuleVersionId,
        /// The artifact kind that was requested.
        kind: ArtifactKind,
        /// Per-repository outcomes, in consultation order.
        attempts: Vec<RepositoryAttempt>,
    },
}

impl ResolveError {
    /// Per-repository attempt records for this failure.
    pub fn attempts(&self) -> &[RepositoryAttempt] {
        match self {
            ResolveError::UnresolvedModule { attempts, .. } => attempts,
            ResolveError::ArtifactResolution { attempts, .. } => attempts,
        }
    }

    fn first_cause(&self) -> Option<&anyhow::Error> {
        self.attempts().iter().find_map(|attempt| attempt.cause.as_ref())
    }
}

fn write_attempts(f: &mut fmt::Formatter<'_>, attempts: &[RepositoryAttempt]) -> fmt::Result {
    if attempts.is_empty() {
        return write!(f, "no repositories configured");
    }
    write!(f, "tried ")?;
    for (i, attempt) in attempts.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", attempt)?;
    }
    Ok(())
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnresolvedModule { request, attempts } => {
                write!(f, "could not resolve module '{}': ", request)?;
                write_attempts(f, attempts)
            }
            ResolveError::ArtifactResolution {
                module,
                kind,
                attempts,
            } => {
                write!(
                    f,
                    "could not resolve {} artifact for module '{}': ",
                    kind, module
                )?;
                write_attempts(f, attempts)
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.first_cause()
            .map(AsRef::<dyn std::error::Error + 'static>::as_ref)
    }
}
