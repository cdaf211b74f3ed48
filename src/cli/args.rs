//! Clap argument types for the kvconf CLI.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Inspect key/value configuration files and cloud credentials.
#[derive(Parser, Debug)]
#[command(name = kvconf::constants::APP_NAME, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Parse a configuration file and print its contents.
    Show(ShowArgs),

    /// Resolve and print provider credentials.
    Credentials(CredentialsArgs),
}

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Path to the configuration file.
    pub file: PathBuf,

    /// Key/value separator token.
    #[arg(long, default_value = kvconf::constants::DEFAULT_SEPARATOR)]
    pub separator: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `credentials` subcommand.
#[derive(Parser, Debug)]
pub struct CredentialsArgs {
    /// Credential provider to resolve.
    #[arg(value_enum)]
    pub provider: Provider,

    /// Override the credential file path.
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Output format for printed results.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable, colorised.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Supported credential providers.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    /// AWS shared credentials (`~/.aws/credentials`).
    Aws,
    /// Rackspace CLI config (`~/.rack/config`).
    Rackspace,
}
