//! Directory listing abstraction.
//!
//! The walker never talks to a server directly. It asks a `DirectoryLister` for the
//! immediate children of one remote directory at a time, which lets the same walk run
//! against a real share (`SmbClientLister`) or a scripted tree (`InMemoryLister`).

use super::errors::InventoryError;
use chrono::{DateTime, Utc};

/// One child as reported by a lister, before the walker turns it into a `RemoteEntry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildDescriptor {
    /// Leaf name. Directories may carry a trailing `/` marker.
    pub name: String,
    pub is_directory: bool,
    /// Size in bytes. Ignored for directories.
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    /// The lister's own absolute address for this child.
    pub full_path: String,
}

/// Lists the direct children of a remote directory.
///
/// `address` is an absolute, `/`-terminated remote address such as
/// `smb://server/share/folder/`. Children come back in the server's order; the
/// walker preserves that order and never sorts.
///
/// Failures must be categorized: `AuthenticationFailure`, `ConnectivityFailure`,
/// `ListingFailure`, or `UnexpectedFailure`. Timeouts are reported as one of these.
pub trait DirectoryLister: Send + Sync {
    fn list(&self, address: &str) -> Result<Vec<ChildDescriptor>, InventoryError>;
}

impl<L: DirectoryLister + ?Sized> DirectoryLister for &L {
    fn list(&self, address: &str) -> Result<Vec<ChildDescriptor>, InventoryError> {
        (**self).list(address)
    }
}
