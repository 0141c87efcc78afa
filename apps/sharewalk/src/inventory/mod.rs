//! Share inventory: walking a remote tree and querying what was found.
//!
//! - `lister`: the `DirectoryLister` trait the walker drives
//! - `walker`: `ShareWalker`, the pre-order walk with per-directory failure isolation
//! - `query`: files-only, directories-only, and name search over a result set
//! - `probe`: one-listing connectivity check
//! - `in_memory`: scripted lister for tests

pub(crate) mod entry;
pub(crate) mod errors;
mod in_memory;
pub(crate) mod lister;
mod probe;
pub mod query;
pub(crate) mod walker;

pub use entry::RemoteEntry;
pub use errors::InventoryError;
pub use in_memory::InMemoryLister;
pub use lister::{ChildDescriptor, DirectoryLister};
pub use probe::ProbeOutcome;
pub use query::{NamePattern, directories_only, files_only, search};
pub use walker::{ShareWalker, SkippedDirectory, Traversal};

#[cfg(test)]
mod query_test;
