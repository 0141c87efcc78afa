//! SMB error classification.
//!
//! `smbclient` reports failures as free text, usually with an NT status name. These
//! helpers map that text onto `InventoryError` categories. When a status name is
//! present it alone decides the category; the rest of the line can contain folder
//! names and is never matched.

use crate::inventory::InventoryError;
use regex::Regex;
use std::sync::OnceLock;

/// NT status names meaning the server refused who we are.
const AUTH_STATUSES: &[&str] = &[
    "NT_STATUS_LOGON_FAILURE",
    "NT_STATUS_ACCOUNT_DISABLED",
    "NT_STATUS_ACCOUNT_LOCKED_OUT",
    "NT_STATUS_ACCOUNT_RESTRICTION",
    "NT_STATUS_PASSWORD_EXPIRED",
    "NT_STATUS_PASSWORD_MUST_CHANGE",
    "NT_STATUS_WRONG_PASSWORD",
    "NT_STATUS_NO_SUCH_USER",
    "NT_STATUS_INVALID_LOGON_HOURS",
];

/// NT status names meaning the server or share couldn't be reached.
const CONNECTIVITY_STATUSES: &[&str] = &[
    "NT_STATUS_BAD_NETWORK_NAME",
    "NT_STATUS_HOST_UNREACHABLE",
    "NT_STATUS_NETWORK_UNREACHABLE",
    "NT_STATUS_CONNECTION_REFUSED",
    "NT_STATUS_CONNECTION_RESET",
    "NT_STATUS_CONNECTION_DISCONNECTED",
    "NT_STATUS_IO_TIMEOUT",
    "NT_STATUS_INVALID_NETWORK_RESPONSE",
    "NT_STATUS_NETWORK_NAME_DELETED",
    "NT_STATUS_PORT_UNREACHABLE",
];

/// NT status names meaning one directory couldn't be read.
const LISTING_STATUSES: &[&str] = &[
    "NT_STATUS_ACCESS_DENIED",
    "NT_STATUS_NO_SUCH_FILE",
    "NT_STATUS_OBJECT_NAME_NOT_FOUND",
    "NT_STATUS_OBJECT_PATH_NOT_FOUND",
    "NT_STATUS_NOT_A_DIRECTORY",
    "NT_STATUS_FILE_IS_A_DIRECTORY",
    "NT_STATUS_OBJECT_NAME_INVALID",
    "NT_STATUS_SHARING_VIOLATION",
    "NT_STATUS_DELETE_PENDING",
];

fn status_token_regex() -> &'static Regex {
    static STATUS_TOKEN: OnceLock<Regex> = OnceLock::new();
    STATUS_TOKEN.get_or_init(|| {
        Regex::new(r"NT_STATUS_[A-Z0-9_]+").unwrap_or_else(|e| panic!("status pattern failed to compile: {e}"))
    })
}

/// Returns the first line that names an NT status, if any.
///
/// Listing lines are indented by two spaces and skipped, so a file called
/// `NT_STATUS_notes.txt` isn't mistaken for an error.
pub fn first_status_line(output: &str) -> Option<&str> {
    output
        .lines()
        .filter(|line| !line.starts_with("  "))
        .map(str::trim)
        .find(|line| status_token_regex().is_match(line))
}

/// The NT status name in `line`, like `NT_STATUS_ACCESS_DENIED`.
pub fn status_token(line: &str) -> Option<&str> {
    status_token_regex().find(line).map(|m| m.as_str())
}

/// Checks if a status line is an authentication error.
///
/// Access denied only counts while connecting to the share (session setup or tree
/// connect). Once connected, it means one folder is off limits.
pub fn is_auth_error(status_line: &str) -> bool {
    let Some(token) = status_token(status_line) else {
        return false;
    };
    if AUTH_STATUSES.contains(&token) {
        return true;
    }
    if CONNECTIVITY_STATUSES.contains(&token) {
        return false;
    }
    let lower = status_line.to_lowercase();
    (token == "NT_STATUS_ACCESS_DENIED" && lower.starts_with("tree connect failed"))
        || lower.starts_with("session setup failed")
}

/// Checks if a status line means the server or share couldn't be reached at all.
pub fn is_connectivity_error(status_line: &str) -> bool {
    status_token(status_line).is_some_and(|token| CONNECTIVITY_STATUSES.contains(&token))
}

/// Matches tool messages that carry no NT status, such as resolver errors.
fn is_connectivity_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("connection refused")
        || lower.contains("no route to host")
        || lower.contains("network is unreachable")
        || lower.contains("timed out")
        || lower.contains("unable to resolve")
        || lower.contains("name or service not known")
        || (lower.contains("connection to") && lower.contains("failed"))
}

/// Classifies `smbclient` output into an `InventoryError`.
///
/// `address` is the directory that was being listed, used for listing failures.
pub fn classify_error(address: &str, output: &str) -> InventoryError {
    let Some(line) = first_status_line(output) else {
        let text = output
            .lines()
            .filter(|line| !line.starts_with("  "))
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
        return if text.is_empty() {
            InventoryError::UnexpectedFailure("smbclient failed without output".to_string())
        } else if is_connectivity_text(&text) {
            InventoryError::ConnectivityFailure(text)
        } else if text.to_lowercase().contains("session setup failed") {
            InventoryError::AuthenticationFailure(text)
        } else {
            InventoryError::UnexpectedFailure(text)
        };
    };

    let message = line.to_string();
    if is_connectivity_error(line) {
        InventoryError::ConnectivityFailure(message)
    } else if is_auth_error(line) {
        InventoryError::AuthenticationFailure(message)
    } else if status_token(line).is_some_and(|token| LISTING_STATUSES.contains(&token)) {
        InventoryError::ListingFailure {
            address: address.to_string(),
            message,
        }
    } else {
        InventoryError::UnexpectedFailure(message)
    }
}
