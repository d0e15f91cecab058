// Main entry point for authreset
mod auth_admin;
mod auth_client;
mod config;
mod orchestrator;
mod utils;

use anyhow::Result;
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::auth_client::HttpAuthAdmin;
use crate::config::{Config, LogFormat};
use crate::orchestrator::Orchestrator;
use crate::utils::console::Console;
use crate::utils::constants::{exit_code_name, EXIT_FAILURE};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse configuration (clap exits on its own for --help and bad flags)
    let config = match Config::parse() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    init_logging(config.log_format);

    match run(&config).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Initialize logging; logs go to stderr so stdout stays readable
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(config: &Config) -> Result<u8> {
    let settings = config.settings()?;

    info!("Target project: {}", settings.api.base_url);
    info!("Bulk reset function: {}", settings.api.bulk_function);
    if settings.api.is_insecure() {
        warn!("Project URL is plain http; credentials are sent unencrypted");
    }

    let mut console = Console::stdout();
    console.banner(format_args!("Password reset - {}", settings.api.base_url));
    console.line("Resetting the password of every user");
    console.blank();

    let client = HttpAuthAdmin::new(settings.api)?;
    let orchestrator = Orchestrator::new(client, settings.plan);
    let outcome = orchestrator.run(&mut console).await;

    let code = outcome.status().exit_code();
    console.blank();
    console.done(format_args!("Process finished ({})", exit_code_name(code)));
    console.flush();

    info!("Exiting with status {}", code);
    Ok(code)
}
