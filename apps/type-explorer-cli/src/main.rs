//! Type Explorer CLI
//!
//! Loads the type system of a metadata server once and prints it.
//!
//! # Usage
//!
//! ```bash
//! # Type counts per category
//! type-explorer --server cocoMDS1 --platform "Core Platform"
//!
//! # All entity type names, as JSON
//! type-explorer --server cocoMDS1 --platform "Core Platform" --json list entities
//!
//! # One type definition
//! type-explorer -c explorer.yaml show entity Asset
//! ```

// CLI tools are expected to print to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod config;
mod logging;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use type_explorer::{
    HttpTypeFetcher, RecordingFailureReporter, SessionState, TracingFailureReporter,
    TypeCategory, TypeRegistryCache,
};

use crate::config::{AppConfig, CliOverrides};

/// Type Explorer - inspect the type system of a metadata server
#[derive(Parser, Debug)]
#[command(name = "type-explorer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server whose types are loaded (overrides config)
    #[arg(long)]
    server: Option<String>,

    /// Platform hosting the server (overrides config)
    #[arg(long)]
    platform: Option<String>,

    /// Base URL of the view service (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Allow a plain http:// base URL (`--insecure=false` turns a configured `true` off)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    insecure: Option<bool>,

    /// Ask for types from the whole cohort rather than the local repository
    /// (`--enterprise=false` turns a configured `true` off)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    enterprise: Option<bool>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the number of types in each category (default)
    Summary,
    /// List type names of one category
    List {
        /// entity, relationship, classification or enum
        category: TypeCategory,
    },
    /// Print the descriptor of one type
    Show {
        /// entity, relationship, classification or enum
        category: TypeCategory,
        /// Type name, e.g. Asset
        name: String,
    },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            server_name: self.server.clone(),
            platform_name: self.platform.clone(),
            base_url: self.base_url.clone(),
            enterprise_option: self.enterprise,
            allow_insecure_http: self.insecure,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.overrides());

    logging::init_logging(&config.logging, cli.verbose);

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let server_name = config
        .server_name
        .clone()
        .context("no server name: pass --server or set server_name in the config")?;
    let platform_name = config
        .platform_name
        .clone()
        .context("no platform name: pass --platform or set platform_name in the config")?;

    let fetcher = HttpTypeFetcher::new(&config.client).context("failed to set up the HTTP client")?;
    let reporter = Arc::new(RecordingFailureReporter::forwarding_to(Arc::new(
        TracingFailureReporter,
    )));
    let session = Arc::new(SessionState::new(config.client.enterprise_option));
    let cache = Arc::new(TypeRegistryCache::new(
        Arc::new(fetcher),
        reporter.clone(),
        session,
    ));

    info!(server = %server_name, platform = %platform_name, "loading type system");
    cache.load(&server_name, &platform_name).await;

    let failures = reporter.drain();
    if !failures.is_empty() {
        for failed in &failures {
            eprintln!(
                "{} {} failed: {}",
                "error:".red().bold(),
                failed.operation,
                failed.failure
            );
        }
        return Ok(ExitCode::FAILURE);
    }

    let output = match cli.command.unwrap_or(Commands::Summary) {
        Commands::Summary => render::summary(&cache.snapshot(), cli.json)?,
        Commands::List { category } => {
            render::list(category, &cache.type_names(category), cli.json)?
        }
        Commands::Show { category, name } => match cache.type_of(category, &name) {
            Some(descriptor) => render::descriptor(&name, &descriptor, cli.json)?,
            None => {
                eprintln!(
                    "{} no {category} type named '{name}'",
                    "error:".red().bold()
                );
                return Ok(ExitCode::FAILURE);
            }
        },
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(ExitCode::SUCCESS)
}
