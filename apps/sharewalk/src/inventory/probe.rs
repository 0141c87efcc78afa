//! Connectivity check run before an expensive walk.

use super::errors::InventoryError;
use super::lister::DirectoryLister;
use super::walker::ShareWalker;
use log::{error, info};

/// Result of probing a share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The root listed fine.
    Connected { address: String, child_count: usize },
    /// The root couldn't be listed. The error says why.
    Failed(InventoryError),
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    pub fn error(&self) -> Option<&InventoryError> {
        match self {
            Self::Connected { .. } => None,
            Self::Failed(err) => Some(err),
        }
    }
}

impl<L: DirectoryLister> ShareWalker<L> {
    /// Lists the root once, keeping nothing but the child count.
    ///
    /// Always returns an outcome; failures of every category end up in
    /// `ProbeOutcome::Failed`.
    pub fn probe(&self) -> ProbeOutcome {
        let address = self.root_address().to_string();
        match self.lister().list(&address) {
            Ok(children) => {
                info!("probe: connected to {} ({} children at the root)", address, children.len());
                ProbeOutcome::Connected {
                    address,
                    child_count: children.len(),
                }
            }
            Err(err) => {
                match &err {
                    InventoryError::AuthenticationFailure(cause) => {
                        error!("probe: authentication failed for {}: {}", address, cause)
                    }
                    InventoryError::ConnectivityFailure(cause) => {
                        error!("probe: couldn't connect to {}: {}", address, cause)
                    }
                    other => error!("probe: unexpected failure for {}: {}", address, other),
                }
                ProbeOutcome::Failed(err)
            }
        }
    }
}
