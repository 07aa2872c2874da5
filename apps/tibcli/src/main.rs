//! tibcli - Command-line client for the cloud application platform
//!
//! This CLI enables developers to:
//! - Log in with their accounts-service credentials
//! - Keep an IDM session alive across commands
//! - See which user and organization they are working as

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use tibcli::api::HttpTransport;
use tibcli::commands;
use tibcli::config::{ConfigPaths, PlaceholderRegistry, Settings};
use tibcli::credentials::SettingsStore;
use tibcli::error::{CliError, CliResult};
use tibcli::interactive::install_interrupt_handler;
use tibcli::logging::{LogConfig, Logger};
use tibcli::session::{Services, SessionController};

/// tibcli - Cloud application platform CLI
#[derive(Parser)]
#[command(name = "tibcli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Show progress messages
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Show HTTP requests and internal decisions
    #[arg(long, global = true)]
    debug: bool,

    /// Show HTTP headers and bodies (secrets masked)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress diagnostic output
    #[arg(short, long, global = true, conflicts_with_all = ["verbose", "debug", "trace"])]
    quiet: bool,

    /// Also write diagnostics to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the platform
    Login(commands::login::LoginArgs),

    /// Revoke the access token and clear the session
    Logout(commands::logout::LogoutArgs),

    /// Display the current user and organization
    Whoami(commands::whoami::WhoamiArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = install_interrupt_handler() {
        eprintln!("Warning: could not install interrupt handler: {}", e);
    }

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    if let Commands::Login(args) = &cli.command {
        args.validate()?;
    }

    let log_config = LogConfig::from_args_and_env(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_file,
    );
    let logger = Arc::new(
        Logger::new(log_config)
            .map_err(|e| CliError::Config(format!("Cannot open log file: {}", e)))?,
    );

    let registry = PlaceholderRegistry::from_env();
    registry.dump(&logger, logger.is_sensitive());

    let settings = Settings::from_env(&registry)?;
    let transport = Arc::new(HttpTransport::new(&settings, logger.clone())?);
    let store = SettingsStore::new(ConfigPaths::new()?);

    let controller = SessionController::new(
        store,
        registry,
        settings,
        logger,
        Services::http(transport),
    );

    match cli.command {
        Commands::Login(args) => commands::login::execute(args, &controller).await,
        Commands::Logout(args) => commands::logout::execute(args, &controller).await,
        Commands::Whoami(args) => commands::whoami::execute(args, &controller).await,
    }
}
