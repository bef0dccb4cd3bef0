//! CLI command definitions and execution
//!
//! Each command parses its paths, connects through a profile, and then runs
//! against `&dyn ObjectStore` so it can be exercised with the in-memory store.

use anyhow::Context;
use clap::{Parser, Subcommand};
use objstore_core::ProfileManager;
use objstore_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod get;
mod ls;
mod profile;
mod put;
mod rm;

/// osc - object store client
///
/// Upload, download, delete and list objects on S3-compatible storage.
#[derive(Parser, Debug)]
#[command(name = "osc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage storage profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Upload a local file or stdin to an object
    Put(put::PutArgs),

    /// Download an object to a file or stdout
    Get(get::GetArgs),

    /// Remove objects
    Rm(rm::RmArgs),

    /// List object keys
    Ls(ls::LsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Profile(cmd) => profile::execute(cmd, output_config).await,
        Commands::Put(args) => put::execute(args, output_config).await,
        Commands::Get(args) => get::execute(args, output_config).await,
        Commands::Rm(args) => rm::execute(args, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
    }
}

/// Build a client for the named profile
async fn connect(profile_name: &str) -> anyhow::Result<S3Client> {
    let manager = ProfileManager::new().context("Failed to load profiles")?;
    let profile = manager
        .get(profile_name)
        .with_context(|| format!("Cannot use profile '{profile_name}'"))?;

    tracing::debug!(profile = profile_name, "connecting");
    let client = S3Client::new(&profile.storage)
        .await
        .with_context(|| format!("Failed to create client for profile '{profile_name}'"))?;
    Ok(client)
}

/// Connect, reporting failures through the formatter
async fn connect_or_report(
    profile_name: &str,
    formatter: &Formatter,
) -> Result<S3Client, ExitCode> {
    connect(profile_name).await.map_err(|e| {
        formatter.error(&format!("{e:#}"));
        ExitCode::from_anyhow(&e)
    })
}
