//! Depth-first share walker.
//!
//! Walks a remote tree one directory listing at a time and returns every file and
//! directory in pre-order: a directory is followed by its whole subtree before its next
//! sibling. Pending directories live on an explicit stack, so nesting depth is limited
//! by memory rather than the call stack, and the cancel flag is checked between
//! listings.
//!
//! Only the first listing can fail the walk. A nested directory that can't be listed
//! is logged, recorded in `Traversal::skipped`, and treated as empty.

use super::entry::RemoteEntry;
use super::errors::InventoryError;
use super::lister::{ChildDescriptor, DirectoryLister};
use super::query::{NamePattern, directories_only, files_only};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// A directory whose subtree is missing from a traversal because listing it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDirectory {
    /// Relative path of the directory entry (the entry itself is in the result).
    pub relative_path: String,
    pub error: InventoryError,
}

/// The outcome of one walk.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Traversal {
    entries: Vec<RemoteEntry>,
    skipped: Vec<SkippedDirectory>,
    cancelled: bool,
}

impl Traversal {
    /// All entries, in pre-order.
    pub fn entries(&self) -> &[RemoteEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RemoteEntry> {
        self.entries
    }

    /// Directories whose contents couldn't be read.
    pub fn skipped(&self) -> &[SkippedDirectory] {
        &self.skipped
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True if the walk stopped early because the cancel flag was set.
    /// The entries collected up to that point are still returned.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all file sizes.
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(RemoteEntry::size).sum()
    }

    pub fn files(&self) -> Vec<&RemoteEntry> {
        files_only(&self.entries)
    }

    pub fn directories(&self) -> Vec<&RemoteEntry> {
        directories_only(&self.entries)
    }

    /// Files whose name fully matches `pattern`.
    pub fn search(&self, pattern: &str) -> Result<Vec<&RemoteEntry>, InventoryError> {
        Ok(NamePattern::new(pattern)?.filter(&self.entries))
    }
}

/// One directory on the work stack: where it sits relative to the start, and the
/// children not yet visited.
struct Frame {
    relative_path: String,
    children: std::vec::IntoIter<ChildDescriptor>,
}

/// Walks a share through a `DirectoryLister`.
///
/// Each walk owns its result vector, so one walker can run several traversals, and
/// independent walkers share nothing.
pub struct ShareWalker<L> {
    lister: L,
    root_address: String,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl<L: DirectoryLister> ShareWalker<L> {
    /// Creates a walker rooted at `root_address` (a `/` is appended if missing).
    pub fn new(lister: L, root_address: impl Into<String>) -> Self {
        let mut root_address = root_address.into();
        if !root_address.ends_with('/') {
            root_address.push('/');
        }
        Self {
            lister,
            root_address,
            cancel_flag: None,
        }
    }

    /// Sets a flag that stops the walk before the next directory listing once it's true.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub fn root_address(&self) -> &str {
        &self.root_address
    }

    pub(super) fn lister(&self) -> &L {
        &self.lister
    }

    /// Walks the whole share.
    pub fn traverse_from_root(&self) -> Result<Traversal, InventoryError> {
        self.walk(self.root_address.clone())
    }

    /// Walks the subtree at `relative_path` under the root.
    ///
    /// Relative paths in the result start below `relative_path`; its own name never
    /// appears in them. Leading, trailing, and doubled separators are ignored and `\`
    /// counts as `/`. A `..` component is rejected as a malformed address.
    pub fn traverse_from_path(&self, relative_path: &str) -> Result<Traversal, InventoryError> {
        let normalized = normalize_relative_path(relative_path)?;
        let address = if normalized.is_empty() {
            self.root_address.clone()
        } else {
            format!("{}{}/", self.root_address, encode_relative_path(&normalized))
        };
        self.walk(address)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn walk(&self, start_address: String) -> Result<Traversal, InventoryError> {
        let started = Instant::now();
        let mut traversal = Traversal::default();

        if self.is_cancelled() {
            debug!("walk: cancelled before listing {}", start_address);
            traversal.cancelled = true;
            return Ok(traversal);
        }

        debug!("walk: listing {}", start_address);
        let top = self.lister.list(&start_address)?;
        let mut stack = vec![Frame {
            relative_path: String::new(),
            children: top.into_iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(child) = frame.children.next() else {
                stack.pop();
                continue;
            };

            let name = strip_directory_marker(&child.name);
            if matches!(name, "" | "." | "..") || name.contains('/') {
                warn!("walk: ignoring child {:?} of {:?}", child.name, frame.relative_path);
                continue;
            }
            let relative_path = if frame.relative_path.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", frame.relative_path, name)
            };

            traversal.entries.push(RemoteEntry::new(
                name,
                relative_path.clone(),
                child.is_directory,
                child.size,
                child.last_modified,
                child.full_path,
            ));

            if !child.is_directory {
                continue;
            }

            if self.is_cancelled() {
                debug!("walk: cancelled before listing {}", relative_path);
                traversal.cancelled = true;
                break;
            }

            let address = format!("{}{}/", start_address, encode_relative_path(&relative_path));
            debug!("walk: listing {}", address);
            match self.lister.list(&address) {
                Ok(children) => stack.push(Frame {
                    relative_path,
                    children: children.into_iter(),
                }),
                Err(error) => {
                    warn!("walk: skipping unreadable directory {}: {}", relative_path, error);
                    traversal.skipped.push(SkippedDirectory { relative_path, error });
                }
            }
        }

        info!(
            "walk: {} done in {:?}: {} entries, {} skipped{}",
            start_address,
            started.elapsed(),
            traversal.entries.len(),
            traversal.skipped.len(),
            if traversal.cancelled { ", cancelled" } else { "" }
        );
        Ok(traversal)
    }
}

/// Removes the trailing `/` some listers put on directory names.
pub(crate) fn strip_directory_marker(name: &str) -> &str {
    name.trim_end_matches('/')
}

/// Turns a user-supplied relative path into `a/b/c` form.
pub(crate) fn normalize_relative_path(path: &str) -> Result<String, InventoryError> {
    let mut parts = Vec::new();
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                return Err(InventoryError::ConnectivityFailure(format!(
                    "Malformed path {path:?}: '..' is not allowed"
                )));
            }
            part => parts.push(part),
        }
    }
    Ok(parts.join("/"))
}

/// Percent-encodes each component of a `/`-separated relative path for use in an address.
pub(crate) fn encode_relative_path(relative_path: &str) -> String {
    relative_path
        .split('/')
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
