//! SMB access.
//!
//! The walker only needs "list one directory". This module provides that on top of
//! Samba's `smbclient` tool, including address parsing, output parsing, and mapping of
//! NT status text onto error categories.

pub(crate) mod smb_address;
pub(crate) mod smb_util;
mod smbclient;
mod smbclient_output;

pub use smb_address::SmbAddress;
pub use smbclient::{CommandOutput, CommandRunner, SmbClientInvocation, SmbClientLister, SystemCommandRunner};
