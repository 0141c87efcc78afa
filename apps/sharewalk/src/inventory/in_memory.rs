//! In-memory lister for tests and dry runs.
//!
//! Holds a scripted tree keyed by address. Children are returned in the order they
//! were added, and any directory can be set up to fail with a chosen error.

use super::errors::InventoryError;
use super::lister::{ChildDescriptor, DirectoryLister};
use super::walker::encode_relative_path;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// 2026-01-01T00:00:00Z, used for every entry unless overridden.
const DEFAULT_MODIFIED_SECS: i64 = 1_767_225_600;

/// A fake share.
pub struct InMemoryLister {
    root_address: String,
    listings: HashMap<String, Vec<ChildDescriptor>>,
    failures: HashMap<String, InventoryError>,
    modified: DateTime<Utc>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryLister {
    /// Creates an empty share at `root_address`.
    pub fn new(root_address: impl Into<String>) -> Self {
        let mut root_address = root_address.into();
        if !root_address.ends_with('/') {
            root_address.push('/');
        }
        let mut listings = HashMap::new();
        listings.insert(root_address.clone(), Vec::new());
        Self {
            root_address,
            listings,
            failures: HashMap::new(),
            modified: DateTime::from_timestamp(DEFAULT_MODIFIED_SECS, 0).unwrap_or_default(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Timestamp given to entries added after this call.
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = modified;
        self
    }

    /// Adds a file at `relative_path`. The parent directory must be added first
    /// (except for root-level files).
    pub fn with_file(mut self, relative_path: &str, size: u64) -> Self {
        self.add_child(relative_path, false, size);
        self
    }

    /// Adds an empty directory at `relative_path`.
    pub fn with_directory(mut self, relative_path: &str) -> Self {
        self.add_child(relative_path, true, 0);
        let address = self.directory_address(relative_path);
        self.listings.entry(address).or_default();
        self
    }

    /// Makes listing the directory at `relative_path` fail. `""` is the root.
    pub fn with_failure(mut self, relative_path: &str, error: InventoryError) -> Self {
        let address = self.directory_address(relative_path);
        self.failures.insert(address, error);
        self
    }

    /// Every address listed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn directory_address(&self, relative_path: &str) -> String {
        let trimmed = relative_path.trim_matches('/');
        if trimmed.is_empty() {
            self.root_address.clone()
        } else {
            format!("{}{}/", self.root_address, encode_relative_path(trimmed))
        }
    }

    fn add_child(&mut self, relative_path: &str, is_directory: bool, size: u64) {
        let trimmed = relative_path.trim_matches('/');
        let (parent, name) = match trimmed.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", trimmed),
        };
        let parent_address = self.directory_address(parent);
        let full_path = if is_directory {
            self.directory_address(trimmed)
        } else {
            format!("{}{}", parent_address, urlencoding::encode(name))
        };
        let child = ChildDescriptor {
            name: if is_directory { format!("{name}/") } else { name.to_string() },
            is_directory,
            size,
            last_modified: self.modified,
            full_path,
        };
        self.listings.entry(parent_address).or_default().push(child);
    }
}

impl DirectoryLister for InMemoryLister {
    fn list(&self, address: &str) -> Result<Vec<ChildDescriptor>, InventoryError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(address.to_string());

        if let Some(error) = self.failures.get(address) {
            return Err(error.clone());
        }
        self.listings
            .get(address)
            .cloned()
            .ok_or_else(|| InventoryError::ListingFailure {
                address: address.to_string(),
                message: "No such directory".to_string(),
            })
    }
}
