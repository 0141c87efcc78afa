//! Share connection settings.
//!
//! A `ShareConfig` is validated once at construction and immutable afterwards. The
//! binary resolves flags and environment variables into one before any network access.

use crate::inventory::InventoryError;
use crate::network::SmbAddress;
use std::fmt;
use std::time::Duration;

/// Listing timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Who we connect as.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Guest,
    User { username: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => f.write_str("Guest"),
            Self::User { username, .. } => f
                .debug_struct("User")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Where the share is and how to log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareConfig {
    server_address: String,
    domain: String,
    credentials: Credentials,
    timeout: Duration,
}

impl ShareConfig {
    /// Validates and normalizes the settings.
    ///
    /// `None` and empty strings both mean "not set". A malformed address is a
    /// `ConnectivityFailure`, the same category a lister reports for it. Giving only one
    /// of username and password is `InvalidConfig`.
    pub fn new(
        address: &str,
        domain: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, InventoryError> {
        let address = address.trim();
        SmbAddress::parse(address).map_err(InventoryError::ConnectivityFailure)?;
        let server_address = if address.ends_with('/') {
            address.to_string()
        } else {
            format!("{address}/")
        };

        let username = username.filter(|s| !s.is_empty());
        let password = password.filter(|s| !s.is_empty());
        let credentials = match (username, password) {
            (None, None) => Credentials::Guest,
            (Some(username), Some(password)) => Credentials::User {
                username: username.to_string(),
                password: password.to_string(),
            },
            (Some(_), None) => {
                return Err(InventoryError::InvalidConfig(
                    "A username was given without a password".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(InventoryError::InvalidConfig(
                    "A password was given without a username".to_string(),
                ));
            }
        };

        Ok(Self {
            server_address,
            domain: domain.map(str::trim).unwrap_or_default().to_string(),
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The share address, always ending in `/`.
    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    /// Domain or workgroup. Empty means the server's default.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_guest(&self) -> bool {
        self.credentials == Credentials::Guest
    }
}
