//! The record produced for every file and directory found on a share.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// One file or directory discovered during a walk.
///
/// Fields are private: an entry is built once by the walker and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    name: String,
    relative_path: String,
    is_directory: bool,
    size: u64,
    last_modified: DateTime<Utc>,
    full_path: String,
}

impl RemoteEntry {
    /// Creates an entry. Directory sizes are forced to 0.
    pub fn new(
        name: impl Into<String>,
        relative_path: impl Into<String>,
        is_directory: bool,
        size: u64,
        last_modified: DateTime<Utc>,
        full_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            is_directory,
            size: if is_directory { 0 } else { size },
            last_modified,
            full_path: full_path.into(),
        }
    }

    /// Leaf name, without any trailing separator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slash-joined path from the walk's starting point.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Size in bytes (0 for directories).
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// The address the lister reported for this entry. Diagnostics only.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Returns true if `self` lies somewhere beneath the directory `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &RemoteEntry) -> bool {
        ancestor.is_directory
            && self
                .relative_path
                .strip_prefix(ancestor.relative_path.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for RemoteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({} bytes, modified: {})",
            if self.is_directory { "DIR" } else { "FILE" },
            self.relative_path,
            self.size,
            self.last_modified.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
