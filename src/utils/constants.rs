// Constants for the auth admin API and console output

// Remote endpoints (relative to the project base URL)
pub const FUNCTIONS_PATH: &str = "functions/v1";
pub const ADMIN_USERS_PATH: &str = "auth/v1/admin/users";

// Bulk reset remote function
pub const DEFAULT_BULK_RESET_FUNCTION: &str = "force-reset-all-passwords";

// Request headers
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";
pub const API_KEY_HEADER: &str = "apikey";

/// Per-request deadline in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Placeholder for users without an email address
pub const MISSING_EMAIL: &str = "N/A";

// Console status icons
pub const ICON_START: &str = "🔐";
pub const ICON_PROGRESS: &str = "🔄";
pub const ICON_OK: &str = "✅";
pub const ICON_FAIL: &str = "❌";
pub const ICON_TALLY: &str = "📊";
pub const ICON_STEPS: &str = "📋";
pub const ICON_DONE: &str = "🏁";

/// Manual remediation shown when every path fails
pub const REMEDIATION_STEPS: &[&str] = &[
    "Contact the hosting provider's support",
    "Request administrative access to the auth project",
    "Ask an administrator to run the password reset manually",
];

// Process exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_PARTIAL: u8 = 1;
pub const EXIT_FAILURE: u8 = 2;

/// Status name shown in the final summary line
pub fn exit_code_name(code: u8) -> &'static str {
    match code {
        EXIT_SUCCESS => "success",
        EXIT_PARTIAL => "partial",
        _ => "failure",
    }
}
