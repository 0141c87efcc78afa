//! Error types for share inventory operations.

use serde::Serialize;
use thiserror::Error;

/// Errors produced while listing, walking, or querying a share.
///
/// Every failure falls into exactly one of these categories. The walker decides
/// per category whether a failure is fatal (initial listing) or recoverable (nested
/// listing), so callers never have to inspect message text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "detail")]
pub enum InventoryError {
    /// The server rejected the credentials (or guest access).
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),
    /// The server or share could not be reached, or the address is malformed.
    #[error("Connectivity failure: {0}")]
    ConnectivityFailure(String),
    /// One specific directory could not be enumerated.
    #[error("Listing failed for {address}: {message}")]
    ListingFailure { address: String, message: String },
    /// The search expression is not a valid regular expression.
    #[error("Invalid search pattern: {0}")]
    PatternSyntaxError(String),
    /// Anything else. Always carries a message.
    #[error("Unexpected failure: {0}")]
    UnexpectedFailure(String),
    /// Rejected at construction time, before any network traffic.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl InventoryError {
    /// Stable label for reports and logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::AuthenticationFailure(_) => "authentication_failure",
            Self::ConnectivityFailure(_) => "connectivity_failure",
            Self::ListingFailure { .. } => "listing_failure",
            Self::PatternSyntaxError(_) => "pattern_syntax_error",
            Self::UnexpectedFailure(_) => "unexpected_failure",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }

    /// Returns the underlying cause text without the category prefix.
    pub fn cause(&self) -> &str {
        match self {
            Self::AuthenticationFailure(msg)
            | Self::ConnectivityFailure(msg)
            | Self::PatternSyntaxError(msg)
            | Self::UnexpectedFailure(msg)
            | Self::InvalidConfig(msg) => msg,
            Self::ListingFailure { message, .. } => message,
        }
    }

    /// Returns a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthenticationFailure(msg) => {
                format!("The server rejected the credentials. Check username, password, and domain. ({msg})")
            }
            Self::ConnectivityFailure(msg) => {
                format!("Couldn't reach the share. Check the address and that the server is online. ({msg})")
            }
            Self::ListingFailure { address, message } => format!("Couldn't read {address}: {message}"),
            Self::PatternSyntaxError(msg) => format!("The search pattern isn't a valid regular expression: {msg}"),
            Self::UnexpectedFailure(msg) => format!("Something unexpected went wrong: {msg}"),
            Self::InvalidConfig(msg) => format!("The configuration is invalid: {msg}"),
        }
    }
}

impl From<regex::Error> for InventoryError {
    fn from(err: regex::Error) -> Self {
        Self::PatternSyntaxError(err.to_string())
    }
}
