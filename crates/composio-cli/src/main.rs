//! Composio CLI - list and execute actions from the command line.

mod commands;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use composio_core::config::{Config, LogFormat};
use composio_toolset::ComposioToolSet;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "composio")]
#[command(about = "Composio - list and execute actions")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to ~/.composio/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    toolset: commands::ToolsetArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show action schemas
    Actions {
        /// Action name (repeatable)
        #[arg(long = "action")]
        actions: Vec<String>,
    },

    /// Show tool schemas for apps
    Tools {
        /// App name (repeatable)
        #[arg(long = "app", required = true)]
        apps: Vec<String>,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Use case to match
        #[arg(long)]
        use_case: Option<String>,
    },

    /// Execute an action
    Execute {
        /// Action name
        action: String,

        /// Action parameters as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,

        /// Entity to execute as
        #[arg(long)]
        entity: Option<String>,
    },

    /// Configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}

fn init_logging(verbose: bool, json: bool, config: &Config) {
    let default_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json || config.logging.format == LogFormat::Json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

/// Run `command`, then tear down the toolset whether or not it succeeded.
async fn with_teardown<T>(
    toolset: &ComposioToolSet,
    command: impl Future<Output = anyhow::Result<T>>,
) -> anyhow::Result<T> {
    let result = command.await;
    toolset.teardown().await?;
    result
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path)?;

    init_logging(cli.verbose, cli.json_logs, &config);
    tracing::debug!(path = %config_path.display(), "Using configuration");

    match cli.command {
        Commands::Actions { actions } => {
            let toolset = cli.toolset.build(&config)?;
            with_teardown(&toolset, commands::run_actions(&toolset, actions)).await?;
        }

        Commands::Tools {
            apps,
            tags,
            use_case,
        } => {
            let toolset = cli.toolset.build(&config)?;
            let args = commands::tools::ToolsArgs {
                apps,
                tags,
                use_case,
            };
            with_teardown(&toolset, commands::run_tools(&toolset, args)).await?;
        }

        Commands::Execute {
            action,
            params,
            entity,
        } => {
            let toolset = cli.toolset.build(&config)?;
            let args = commands::execute::ExecuteArgs {
                action,
                params,
                entity,
            };
            with_teardown(&toolset, commands::run_execute(&toolset, args)).await?;
        }

        Commands::Config { action } => match action {
            Some(ConfigCommands::Path) => println!("{}", config_path.display()),
            Some(ConfigCommands::Show) | None => {
                commands::run_config_show(&config_path, &config, &cli.toolset)?;
            }
        },
    }

    Ok(())
}
