// Warn on unused code to catch dead code early
#![warn(unused)]
// Warn on unused dependencies
#![warn(unused_crate_dependencies)]
// Warn on redundant path prefixes (e.g., std::path::Path when Path is imported)
#![warn(unused_qualifications)]
// Output goes through `io::Write` handles or log::* macros, never println!/eprintln!
#![deny(clippy::print_stdout, clippy::print_stderr)]

//! Recursive inventory of SMB shares.
//!
//! `inventory` holds the walker and the queries over its results and never touches
//! the network itself. `network` supplies the `smbclient`-backed lister, `config` the
//! validated connection settings, and `report` plus `cli` the user-facing surface.

// env_logger is only initialized by the binary
use env_logger as _;
// Dev dependencies used only by tests/cli.rs
#[cfg(test)]
use assert_cmd as _;
#[cfg(test)]
use predicates as _;

pub mod cli;
pub mod config;
pub mod inventory;
pub mod network;
pub mod report;
