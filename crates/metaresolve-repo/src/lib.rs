//! Repository backends for module metadata resolution.
//!
//! This crate provides:
//! - [`Repository`]: the backend trait (resolve a dependency request, fetch
//!   an artifact, check artifact existence)
//! - [`FsRepository`]: directory-backed repository with a conventional
//!   `group/name/version` layout
//! - [`HttpRepository`]: blocking HTTP repository with checksum verification
//!   and a local download cache
//! - [`DownloadCache`]: on-disk cache for fetched artifact files

pub mod cache;
pub mod fs;
pub mod http;
pub mod layout;
pub mod repository;
pub mod testing;

pub use cache::DownloadCache;
pub use fs::FsRepository;
pub use http::HttpRepository;
pub use repository::Repository;
