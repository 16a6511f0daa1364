//! stackman - Docker Compose stack manager CLI

use clap::{Parser, Subcommand};
use stackman_cli::commands;
use stackman_config::{GlobalConfig, StackEnv};
use stackman_core::StackManager;
use stackman_provider::{create_default_runtime, ComposeCli, ComposeOperation};
use std::path::PathBuf;
use tracing_subscriber::{
    filter::filter_fn, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

#[derive(Parser)]
#[command(name = "stackman")]
#[command(author, version, about = "Docker Compose stack manager", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Compose file to use (overrides STACK_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    stack_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the stack for the current directory
    Up,

    /// Stop the stack, keeping volumes
    Down,

    /// Restart every service in the stack
    Restart,

    /// Remove the stack's containers and named volumes
    Destroy {
        /// Skip confirmation prompts
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List the project's containers
    Status {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config,
}

impl Commands {
    /// Whether the command talks to the Docker daemon directly
    fn needs_runtime(&self) -> bool {
        matches!(self, Commands::Status { .. })
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_filter(filter_fn(|_| !stackman_tui::dashboard_active())),
        )
        .init();

    let config = match GlobalConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring unreadable config: {}", e);
            GlobalConfig::default()
        }
    };

    let mut stack = StackEnv::detect();
    if let Some(path) = cli.stack_file {
        stack = stack.with_stack_file(path);
    }

    // Config needs neither a project nor a daemon
    if let Some(Commands::Config) = &cli.command {
        return commands::config(&config, &stack);
    }

    let runner = Box::new(ComposeCli::new());
    let connect = cli.command.as_ref().map_or(true, Commands::needs_runtime);
    let manager = if connect {
        match create_default_runtime(&config).await {
            Ok(runtime) => StackManager::new(runtime, runner, stack, config),
            Err(e) => StackManager::disconnected(runner, stack, config, e.to_string()),
        }
    } else {
        StackManager::compose_only(runner, stack, config)
    };

    let Some(command) = cli.command else {
        stackman_tui::run(manager).await?;
        return Ok(());
    };

    let project_dir = std::env::current_dir()?;
    match command {
        Commands::Up => commands::compose(&manager, &project_dir, ComposeOperation::Up).await?,
        Commands::Down => commands::compose(&manager, &project_dir, ComposeOperation::Down).await?,
        Commands::Restart => {
            commands::compose(&manager, &project_dir, ComposeOperation::Restart).await?
        }
        Commands::Destroy { yes } => commands::destroy(&manager, &project_dir, yes).await?,
        Commands::Status { json } => commands::status(&manager, &project_dir, json).await?,
        Commands::Config => unreachable!(), // Handled above
    }

    Ok(())
}
