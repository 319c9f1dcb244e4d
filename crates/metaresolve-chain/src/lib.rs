//! Repository chain and scoped descriptor-parse resolution.
//!
//! This crate provides:
//! - [`RepositoryChain`]: ordered repositories with two-stage resolution
//!   (dependency request to module metadata, then module metadata to local
//!   artifact files)
//! - [`DependencyVersionResolver`] / [`ModuleArtifactResolver`]: the trait
//!   seams a parse context consumes, so callers are not coupled to the
//!   concrete chain
//! - [`DescriptorParseContext`]: the scoped resolution context a descriptor
//!   parser consults when it needs metadata for a related module
//! - [`ResolveError`]: the stage-distinguishing failure taxonomy

pub mod chain;
pub mod context;
pub mod error;
pub mod resolvers;

pub use chain::RepositoryChain;
pub use context::DescriptorParseContext;
pub use error::{RepositoryAttempt, ResolveError};
pub use resolvers::{DependencyVersionResolver, ModuleArtifactResolver};
