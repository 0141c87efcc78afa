//! Views over an already collected entry set.
//!
//! Nothing here talks to the server, so any number of queries over one traversal cost
//! no extra round-trips.

use super::entry::RemoteEntry;
use super::errors::InventoryError;
use regex::Regex;

/// Entries that are files, in their original order.
pub fn files_only(entries: &[RemoteEntry]) -> Vec<&RemoteEntry> {
    entries.iter().filter(|entry| !entry.is_directory()).collect()
}

/// Entries that are directories, in their original order.
pub fn directories_only(entries: &[RemoteEntry]) -> Vec<&RemoteEntry> {
    entries.iter().filter(|entry| entry.is_directory()).collect()
}

/// Files whose name fully matches the regular expression `pattern`.
///
/// `".*\\.log"` matches `b.log` but `"log"` doesn't; this is a whole-name match, not a
/// substring search. Directories never match.
pub fn search<'a>(entries: &'a [RemoteEntry], pattern: &str) -> Result<Vec<&'a RemoteEntry>, InventoryError> {
    Ok(NamePattern::new(pattern)?.filter(entries))
}

/// A compiled whole-name pattern, reusable across entry sets.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    anchored: Regex,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self, InventoryError> {
        // Validate the pattern on its own first: wrapping it in a group could turn
        // something like `a)(b` into a valid expression.
        Regex::new(pattern)?;
        let anchored = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            source: pattern.to_string(),
            anchored,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, name: &str) -> bool {
        self.anchored.is_match(name)
    }

    /// Files among `entries` whose name matches, in order.
    pub fn filter<'a>(&self, entries: &'a [RemoteEntry]) -> Vec<&'a RemoteEntry> {
        entries
            .iter()
            .filter(|entry| !entry.is_directory() && self.matches(entry.name()))
            .collect()
    }
}
