use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pathway_explorer::{
    cli::{execute_command, Commands},
    config::{Config, LogFormat},
    PathwayExplorerAgent,
};

/// Discover, scrape, validate, and store metabolic pathways.
#[derive(Parser, Debug)]
#[command(name = "pathway-explorer", version, about)]
struct Cli {
    /// Pathway store file (overrides PATHWAY_DB_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(path) = cli.store {
        config.store.path = path;
    }

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %config.store.path.display(),
        "Pathway explorer starting..."
    );

    let mut agent = match PathwayExplorerAgent::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            error!(error = %e, "Failed to initialize agent");
            return Err(e.into());
        }
    };

    let result = execute_command(cli.command, &mut agent).await;
    if result.exit_code == 0 {
        println!("{}", result.message.trim_end());
    } else {
        eprintln!("{}", result.message.trim_end());
        std::process::exit(result.exit_code);
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
