//! Port for the remote authentication administration service
//!
//! The orchestrator only talks to the auth service through [`AuthAdmin`].
//! Every operation returns a typed [`CallError`] instead of panicking or
//! bubbling up transport errors, so a failed call never aborts the run.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::utils::constants::MISSING_EMAIL;

/// Failure of a single remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// Connection refused, DNS failure, TLS verification failure, ...
    #[error("connection error: {0}")]
    Transport(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Any status other than 200
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not the JSON we expected
    #[error("invalid response body ({reason}): {body}")]
    Decode { reason: String, body: String },

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

impl CallError {
    /// Short machine-friendly name, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            CallError::Transport(_) => "transport",
            CallError::Timeout(_) => "timeout",
            CallError::Status { .. } => "status",
            CallError::Decode { .. } => "decode",
            CallError::InvalidUrl(_) => "invalid_url",
        }
    }
}

/// A user record owned by the remote auth service
///
/// Only the fields the orchestrator needs are kept; everything else the
/// service returns is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
}

impl User {
    /// Email for display, or `N/A` when the user has none
    pub fn display_email(&self) -> &str {
        display_email(self.email.as_deref())
    }
}

/// One entry of the user list
///
/// A record without a usable id cannot be updated, but it still counts as
/// an attempted user so the tally covers the whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListedUser {
    Valid(User),
    Malformed {
        email: Option<String>,
        reason: String,
        /// The record as received, for the failure report
        record: String,
    },
}

impl ListedUser {
    pub fn id(&self) -> Option<&str> {
        match self {
            ListedUser::Valid(user) => Some(&user.id),
            ListedUser::Malformed { .. } => None,
        }
    }

    pub fn display_email(&self) -> &str {
        match self {
            ListedUser::Valid(user) => user.display_email(),
            ListedUser::Malformed { email, .. } => display_email(email.as_deref()),
        }
    }
}

impl From<User> for ListedUser {
    fn from(user: User) -> Self {
        ListedUser::Valid(user)
    }
}

fn display_email(email: Option<&str>) -> &str {
    match email {
        Some(email) if !email.is_empty() => email,
        _ => MISSING_EMAIL,
    }
}

/// Per-user failure reported by the bulk reset function
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BulkResetFailure {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BulkResetResults {
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub failed: Vec<BulkResetFailure>,
}

/// Typed view of the bulk reset response
///
/// The remote function is opaque, so every field is optional. A body that
/// does not match this shape yields an empty summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BulkResetSummary {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub success: Option<u64>,
    #[serde(default)]
    pub failed: Option<u64>,
    #[serde(default)]
    pub results: Option<BulkResetResults>,
}

/// Successful response of the bulk reset function
#[derive(Debug, Clone, PartialEq)]
pub struct BulkResetResponse {
    /// Body exactly as returned, for display
    pub body: serde_json::Value,
    pub summary: BulkResetSummary,
}

impl BulkResetResponse {
    pub fn from_body(body: serde_json::Value) -> Self {
        let summary = serde_json::from_value(body.clone()).unwrap_or_default();
        Self { body, summary }
    }
}

/// Remote operations the orchestrator depends on
#[allow(async_fn_in_trait)]
pub trait AuthAdmin {
    /// Ask the privileged remote function to reset every password at once
    async fn bulk_reset(&self) -> Result<BulkResetResponse, CallError>;

    /// List every user of the project
    async fn list_users(&self) -> Result<Vec<ListedUser>, CallError>;

    /// Set a single user's password
    async fn update_password(&self, user_id: &str, password: &str) -> Result<(), CallError>;
}
