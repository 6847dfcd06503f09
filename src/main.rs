//! Plot Viewer CLI application
//!
//! Command-line interface for browsing pre-generated plots through the
//! manifest filter cascade.

use std::process;

use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use plot_viewer::cli::{
    handle_browse, handle_config, handle_manifest, handle_options, handle_view, Cli, Commands,
};
use plot_viewer::config::AppConfig;
use plot_viewer::errors::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        error!("Command failed ({} error): {}", e.category(), e);
        eprintln!("Error: {}", e);
        if e.is_recoverable() {
            eprintln!(
                "The manifest could not be reached; check its location and run the command again."
            );
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    let mut config = AppConfig::load(cli.global.config.clone()).await?;
    config.apply_cli_overrides(cli.global.manifest.as_deref(), cli.global.base_url.as_deref());

    init_logging(&cli, &config);

    info!("Plot Viewer v{} starting", env!("CARGO_PKG_VERSION"));

    let quiet = cli.global.quiet;
    match cli.command {
        Commands::View(args) => {
            info!("Executing view command");
            handle_view(&config, args, quiet).await
        }
        Commands::Options(args) => {
            info!("Executing options command");
            handle_options(&config, args, quiet).await
        }
        Commands::Browse => {
            info!("Executing browse command");
            handle_browse(&config, quiet).await
        }
        Commands::Manifest(args) => {
            info!("Executing manifest command");
            handle_manifest(&config, args, quiet).await
        }
        Commands::Config(args) => handle_config(&config, args).await,
    }
}

/// Initialize logging from CLI verbosity, falling back to the config file level
///
/// `RUST_LOG` takes precedence over both.
fn init_logging(cli: &Cli, config: &AppConfig) {
    let level = match cli.requested_log_level() {
        Some(level) => level.to_string().to_lowercase(),
        None => config.logging.level.to_lowercase(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plot_viewer={}", level)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
