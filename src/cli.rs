//! Command-line interface for sheetcal
//!
//! Argument parsing, the two interactive prompts, and the top-level run
//! sequence. All failures funnel back to the caller as one error chain;
//! there is no per-kind exit code.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth;
use crate::config::{CliOverrides, Config};
use crate::generator::{CalendarGenerator, CalendarRequest};
use crate::logging;
use crate::sheets::{RestBackend, RetryingBackend};

/// sheetcal - content calendar generator for Google Sheets
#[derive(Parser)]
#[command(name = "sheetcal")]
#[command(about = "Create a templated content calendar spreadsheet for a client")]
#[command(long_about = r#"
sheetcal creates a content calendar in Google Sheets: a formatted header row,
sample entries, pre-dated planning rows, dropdown validation for the
Platform / Content Type / Status columns, and an Instructions sheet.

EXAMPLES:
  # Interactive: prompts for the client name and planning horizon
  sheetcal

  # Non-interactive
  sheetcal --client "Acme, Inc!" --weeks 8

  # Against a self-hosted or stub endpoint
  sheetcal --base-url http://localhost:8080 --client Acme

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults.
  The config file is discovered by searching upward from CWD for
  .sheetcal/config.toml; use --config to pass an explicit path.

CREDENTIALS:
  The tool expects an OAuth client descriptor (credentials.json) and an
  authorized-user token artifact (token.json) in the working directory.
  Expired tokens are refreshed and written back with owner-only permissions.

For more information, see: https://github.com/cadent-creative/sheetcal
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// OAuth client descriptor file name (in the working directory)
    #[arg(long)]
    pub credentials_file: Option<String>,

    /// Token artifact file name (in the working directory)
    #[arg(long)]
    pub token_file: Option<String>,

    /// Base URL of the Sheets API endpoint
    #[arg(long)]
    pub base_url: Option<String>,

    /// Client name used in the document title (prompted when omitted)
    #[arg(long)]
    pub client: Option<String>,

    /// Weeks of planning rows to pre-populate (prompted when omitted)
    #[arg(long)]
    pub weeks: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the CLI end to end
///
/// # Errors
///
/// Returns the first fatal error from configuration, authentication, or the
/// creation sequence; the caller maps it to a generic non-zero exit.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(cli.verbose)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let config = Config::discover(&CliOverrides {
        config: cli.config.clone(),
        credentials_file: cli.credentials_file.clone(),
        token_file: cli.token_file.clone(),
        base_url: cli.base_url.clone(),
    })
    .context("invalid configuration")?;

    let client_raw = match cli.client {
        Some(value) => value,
        None => prompt("Enter client name: ")?,
    };
    let weeks_raw = match cli.weeks {
        Some(value) => value,
        None => prompt("How many weeks ahead to plan? (default: 4): ")?,
    };
    let request = CalendarRequest::from_raw(&client_raw, &weeks_raw);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let handle = runtime.block_on(async {
        let session = auth::authorize(&config)
            .await
            .context("authentication failed")?;

        let rest = RestBackend::new(Arc::new(session), config.base_url.as_str())
            .context("failed to construct the backend client")?;
        let backend = Arc::new(RetryingBackend::new(Arc::new(rest)));

        CalendarGenerator::new(backend)
            .create(&request)
            .await
            .context("failed to create the content calendar")
    })?;

    // The sharable locator is the tool's one piece of stdout output.
    println!("{}", handle.url);
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    std::io::stdout()
        .flush()
        .context("failed to flush prompt")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read input")?;
    Ok(line.trim().to_string())
}
