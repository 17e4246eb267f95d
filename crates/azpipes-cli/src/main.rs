//! azpipes CLI tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::pipelines::{ListArgs, TriggerArgs};

#[derive(Parser)]
#[command(name = "azpipes")]
#[command(about = "Azure DevOps pipelines CLI", long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ./azpipes.kdl if present)
    #[arg(long, global = true, env = "AZPIPES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List and trigger pipelines
    Pipelines {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum PipelineCommands {
    /// List pipelines in a project
    List(ListArgs),
    /// Trigger a pipeline run
    Trigger(TriggerArgs),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the resolved configuration with secrets redacted
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries JSON results.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Pipelines { command } => {
            let service = commands::connect(config_path)?;
            match command {
                PipelineCommands::List(args) => {
                    commands::pipelines::list(&service, args).await?;
                }
                PipelineCommands::Trigger(args) => {
                    commands::pipelines::trigger(&service, args).await?;
                }
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                commands::show_config(config_path)?;
            }
        },
    }

    Ok(())
}
