//! kvconf — key/value configuration inspector.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use kvconf::credentials::{AwsCredentials, RackspaceCredentials};
use kvconf::parser::{KvConfig, Value};

use cli::args::{Cli, Command, CredentialsArgs, OutputFormat, Provider, ShowArgs};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Show(args) => run_show(args),
        Command::Credentials(args) => run_credentials(args),
    }
}

/// Parse a configuration file and print scalars and groups in file order.
fn run_show(args: ShowArgs) -> Result<()> {
    let config = KvConfig::load_with_separator(&args.file, &args.separator)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    match args.format {
        OutputFormat::Json => {
            let object: serde_json::Map<String, serde_json::Value> = config
                .iter()
                .map(|(name, value)| Ok((name.to_string(), serde_json::to_value(value)?)))
                .collect::<Result<_, serde_json::Error>>()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(object))?
            );
        }
        OutputFormat::Text => {
            for (name, value) in config.iter() {
                match value {
                    Value::Scalar(v) => println!("{} {} {}", name.bold(), "=".dimmed(), v),
                    Value::Group(map) => {
                        println!("{}", format!("[{name}]").cyan().bold());
                        for (key, v) in map {
                            println!("  {} {} {}", key, "=".dimmed(), v);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Resolve provider credentials and print them with the secret masked
/// in text output.
fn run_credentials(args: CredentialsArgs) -> Result<()> {
    match args.provider {
        Provider::Aws => {
            let creds = match &args.path {
                Some(path) => AwsCredentials::load_from(path),
                None => AwsCredentials::load(),
            }
            .context("failed to load AWS credentials")?;

            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&creds)?),
                OutputFormat::Text => {
                    println!("{}          {}", "provider:".dimmed(), creds.provider.bold());
                    println!("{}            {}", "region:".dimmed(), creds.region);
                    println!("{}     {}", "access key id:".dimmed(), creds.aws_access_key_id);
                    println!(
                        "{} {}",
                        "secret access key:".dimmed(),
                        mask(&creds.aws_secret_access_key)
                    );
                }
            }
        }
        Provider::Rackspace => {
            let creds = match &args.path {
                Some(path) => RackspaceCredentials::load_from(path),
                None => RackspaceCredentials::load(),
            }
            .context("failed to load Rackspace credentials")?;

            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&creds)?),
                OutputFormat::Text => {
                    println!("{} {}", "provider:".dimmed(), creds.provider.bold());
                    println!("{} {}", "username:".dimmed(), creds.username);
                    println!("{}  {}", "api key:".dimmed(), mask(&creds.api_key));
                    println!("{}   {}", "region:".dimmed(), creds.region);
                }
            }
        }
    }

    Ok(())
}

/// Mask a secret, keeping only the first four characters.
fn mask(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        let head: String = secret.chars().take(4).collect();
        format!("{head}****")
    }
}
