//! Triage CLI - command line and GitHub Action entry point
//!
//! Moves unassigned issues and pull requests from an "open" status to a new
//! status on a GitHub project board.

mod commands;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use triage_core::{Config, Secrets};

use commands::RunArgs;

/// Triage: keep project board statuses in step with issue activity
#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// GraphQL endpoint (overrides config and env)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Update the status of the item that triggered the workflow
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Show current configuration
    Config {
        /// Create a secrets file template if none exists
        #[arg(long)]
        init_secrets: bool,
    },

    /// Show version information
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries workflow commands
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{:#}", err);
            tracing::error!(error = %message, "triage failed");
            println!("{}", output::error_command(&message));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => {
            let config = Config::load_with_overrides(cli.api_url)?;
            if cli.verbose {
                tracing::debug!(
                    api_url = %config.github.api_url,
                    timeout = ?config.github.timeout,
                    "Configuration loaded"
                );
            }
            args.execute(&config).await?;
        }
        Some(Commands::Config { init_secrets }) => {
            let config = Config::load_with_overrides(cli.api_url)?;
            print_config(&config);
            if init_secrets {
                let path = Secrets::create_template()?;
                println!();
                println!("Created secrets template at {}", path.display());
            }
        }
        Some(Commands::Version) => {
            println!("triage {}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("Triage - project board status automation");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn print_config(config: &Config) {
    println!("Triage Configuration");
    println!("====================");
    println!();
    println!("GitHub Settings:");
    println!("  api_url: {}", config.github.api_url);
    println!("  timeout: {:?}", config.github.timeout);
    println!();

    let files = [
        ("Config file", Config::default_config_path()),
        ("Secrets file", Secrets::default_secrets_path()),
    ];
    for (label, path) in files {
        if let Some(path) = path {
            println!("{}: {}", label, path.display());
            if path.exists() {
                println!("  (exists)");
            } else {
                println!("  (not found - using defaults)");
            }
        }
    }
}
