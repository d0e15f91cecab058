use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use redact::Secret;
use std::time::Duration;
use url::Url;

use crate::auth_client::ApiSettings;
use crate::orchestrator::ResetPlan;
use crate::utils::constants::{DEFAULT_BULK_RESET_FUNCTION, DEFAULT_TIMEOUT_SECS};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT_SHA"),
    ")"
);

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// authreset - force-reset every password of a hosted auth project
///
/// Tries the privileged bulk reset function first and falls back to
/// listing users and updating them one by one.
#[derive(Parser, Debug)]
#[command(name = "authreset")]
#[command(version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Config {
    /// Project base URL, e.g. https://<project>.supabase.co
    #[arg(long, env = "AUTHRESET_URL")]
    pub url: String,

    /// Service key, sent as bearer token and apikey
    #[arg(long, env = "AUTHRESET_SERVICE_KEY", hide_env_values = true)]
    pub service_key: String,

    /// Admin token required by the bulk reset function
    #[arg(long, env = "AUTHRESET_ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// Password every user is reset to
    #[arg(long, env = "AUTHRESET_NEW_PASSWORD", hide_env_values = true)]
    pub new_password: String,

    /// Name of the bulk reset remote function
    #[arg(long, env = "AUTHRESET_FUNCTION", default_value = DEFAULT_BULK_RESET_FUNCTION)]
    pub function: String,

    /// Per-request deadline in seconds
    #[arg(long, env = "AUTHRESET_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Number of per-user updates in flight at once
    #[arg(long, env = "AUTHRESET_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    /// Log output format (logs go to stderr)
    #[arg(long, env = "AUTHRESET_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Validated configuration handed to the client and orchestrator
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub plan: ResetPlan,
}

impl Config {
    pub fn parse() -> Result<Self> {
        let config = <Self as Parser>::parse();
        Ok(config)
    }

    /// Validate raw values and wrap credentials
    pub fn settings(&self) -> Result<Settings> {
        let base_url = Url::parse(self.url.trim())
            .with_context(|| format!("Invalid project URL: {}", self.url))?;
        if !matches!(base_url.scheme(), "https" | "http") {
            bail!("Project URL must be an http(s) URL: {}", self.url);
        }

        if self.service_key.trim().is_empty() {
            bail!("Service key must not be empty");
        }
        if self.new_password.is_empty() {
            bail!("New password must not be empty");
        }
        if self.function.trim().is_empty() {
            bail!("Bulk reset function name must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("Timeout must be at least 1 second");
        }
        if self.concurrency == 0 {
            bail!("Concurrency must be at least 1");
        }

        let admin_token = self
            .admin_token
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|t| Secret::from(t.clone()));

        Ok(Settings {
            api: ApiSettings {
                base_url,
                service_key: Secret::from(self.service_key.trim().to_string()),
                admin_token,
                bulk_function: self.function.trim().to_string(),
                timeout: Duration::from_secs(self.timeout_secs),
            },
            plan: ResetPlan {
                new_password: Secret::from(self.new_password.clone()),
                concurrency: self.concurrency,
            },
        })
    }
}
