//! Module version identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies one version of one module: `group:name:version`.
///
/// Immutable value type. A new id is created per lookup request; nothing in
/// the workspace mutates one after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleVersionId {
    /// Organization/group segment (e.g., "org.example").
    pub group: String,
    /// Module name within the group.
    pub name: String,
    /// Version string. Treated as opaque; no version-range semantics here.
    pub version: String,
}

impl ModuleVersionId {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The group rendered as a relative path (`org.example` -> `org/example`).
    pub fn group_path(&self) -> String {
        self.group.replace('.', "/")
    }
}

impl fmt::Display for ModuleVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// Error parsing a `group:name:version` coordinate string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModuleVersionIdError {
    input: String,
}

impl fmt::Display for ParseModuleVersionIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid module coordinate '{}': expected group:name:version",
            self.input
        )
    }
}

impl std::error::Error for ParseModuleVersionIdError {}

impl FromStr for ModuleVersionId {
    type Err = ParseModuleVersionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(name), Some(version), None)
                if !group.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(group, name, version))
            }
            _ => Err(ParseModuleVersionIdError {
                input: s.to_string(),
            }),
        }
    }
}
