//! acr CLI - JavaEE application client packaging
//!
//! Commands:
//! - `acr package` - Build the application client JAR described by acr.toml
//! - `acr list` - List the entries and manifest of a JAR
//! - `acr check` - Validate an acr.toml build descriptor

use acr_core::AcrError;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod check;
mod list;
mod logging;
mod package;

#[derive(Parser)]
#[command(name = "acr")]
#[command(author, version, about = "Build JavaEE application client archives", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package the project output directory into an application client JAR
    Package {
        /// Path to acr.toml (default: ./acr.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Set a user property (e.g. -D maven.acr.filterDeploymentDescriptor=true)
        #[arg(short = 'D', value_name = "KEY=VALUE")]
        define: Vec<String>,

        /// Print the artifact record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the entries and main manifest attributes of a JAR
    List {
        /// JAR file to inspect
        jar: PathBuf,
    },

    /// Validate an acr.toml build descriptor
    Check {
        /// Path to acr.toml (default: ./acr.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Package {
            config,
            define,
            json,
        } => package::run(config, &define, json),
        Commands::List { jar } => list::run(&jar),
        Commands::Check { config } => check::run(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::from(exit_code(&error))
        }
    }
}

/// Packaging failures keep their class specific code, anything else exits with 1.
fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<AcrError>()
        .map_or(1, AcrError::error_code)
}
