// Trading Dashboard - terminal client for the trading bot backend
// Single entry point for watching and operating the bot

use clap::{Parser, Subcommand};
use tracing::{error, info, warn, Level};
use trade_dashboard::{Config, ConfigError, DashboardResult};

// Load command modules from cli directory
#[path = "../cli/watch_commands.rs"]
mod watch_commands;
#[path = "../cli/backend_commands.rs"]
mod backend_commands;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(version = "0.2.0")]
#[command(about = "Trading bot dashboard", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "dashboard.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,

    /// Follow price, position and lockout; read operator commands from stdin
    Watch,

    /// Place one manual order (buy, sell or close) and wait for the result
    Order {
        /// Order side
        side: String,
    },

    /// Show position, lockout and which orders are currently allowed
    Status,

    /// Show recent trades
    History {
        /// Maximum number of trades to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Backend trading settings
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the backend's current settings
    Show,

    /// Update settings, e.g. `settings set leverage=5 stop_loss=1.5`
    Set {
        /// key=value pairs
        #[arg(required = true)]
        assignments: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Config is optional for init; read it before logging so its level applies
    let loaded = if matches!(cli.command, Commands::Init) {
        None
    } else {
        Some(Config::from_file(&cli.config))
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        match &loaded {
            Some(Ok(config)) => parse_level(&config.logging.log_level),
            _ => Level::INFO,
        }
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 Trading Dashboard v0.2.0");
    info!("📁 Config: {}", cli.config);

    let config = match loaded {
        None => {
            init_workspace(&cli.config)?;
            return Ok(());
        }
        Some(result) => config_or_exit(result),
    };

    let result = run_command(cli.command, &config).await;
    if let Err(e) = result {
        error!("❌ {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run_command(command: Commands, config: &Config) -> DashboardResult<()> {
    match command {
        Commands::Init => Ok(()),
        Commands::Watch => watch_commands::watch(config).await,
        Commands::Order { side } => watch_commands::place_order(&side, config).await,
        Commands::Status => watch_commands::show_status(config).await,
        Commands::History { limit } => backend_commands::show_history(limit, config).await,
        Commands::Settings(SettingsCommands::Show) => backend_commands::show_settings(config).await,
        Commands::Settings(SettingsCommands::Set { assignments }) => {
            backend_commands::set_settings(&assignments, config).await
        }
    }
}

/// Return the config or exit with a helpful error message
fn config_or_exit(result: Result<Config, ConfigError>) -> Config {
    match result {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuration Error");
            error!("{}", e);

            if matches!(e, ConfigError::FileNotFound(_)) {
                error!("");
                error!("💡 Quick fix:");
                error!("   1. Run: dashboard init");
                error!("   2. Edit dashboard.toml with your backend URL");
                error!("   3. Try again");
            }

            std::process::exit(1);
        }
    }
}

fn init_workspace(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    if std::path::Path::new(config_path).exists() {
        warn!("⚠️  {} already exists, skipping", config_path);
        return Ok(());
    }

    let default_config = include_str!("../../dashboard.toml.example");
    std::fs::write(config_path, default_config)?;
    info!("📝 Created {}", config_path);
    info!("💡 Next steps:");
    info!("   1. Point backend.base_url at the trading bot");
    info!("   2. Run: dashboard status");
    info!("   3. Run: dashboard watch");
    Ok(())
}

fn parse_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
