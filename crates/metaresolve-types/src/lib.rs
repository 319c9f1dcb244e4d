//! Shared types for the metaresolve workspace.
//!
//! This crate provides the foundational value types used across the
//! repository backends, the resolution chain, and the CLI, breaking circular
//! dependency chains.
//!
//! ## Identity and request types
//!
//! - [`ModuleVersionId`] - (group, name, version) coordinates of a module
//! - [`ArtifactRef`] - one artifact of one module version
//! - [`DependencyRequest`] - a resolve request, optionally pinned to an exact
//!   version
//!
//! ## Resolution outcomes
//!
//! - [`ResolvedModuleMetadata`] - module coordinates plus available artifacts
//! - [`ResolvedArtifact`] / [`ResolvedArtifactSet`] - locally materialized
//!   artifact files, grouped by kind
//! - [`LocalResource`] - a local file paired with its canonical origin URI

pub mod artifact;
pub mod descriptor;
pub mod env_utils;
pub mod ids;
pub mod request;

pub use artifact::{ArtifactKind, ArtifactRef, LocalResource, ResolvedArtifact, ResolvedArtifactSet};
pub use descriptor::{DependencyDecl, ModuleDescriptor};
pub use ids::ModuleVersionId;
pub use request::{DependencyRequest, ResolvedModuleMetadata};
