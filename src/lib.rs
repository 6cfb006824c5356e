pub mod api;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod export;
pub mod policy;
pub mod services;

pub use config::Config;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("serve") => run_server(config).await,

        Some("init" | "--init") => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("Config file already exists, nothing to do.");
            }
            Ok(())
        }

        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }

        Some(other) => {
            println!("Unknown command: {other}");
            println!();
            print_help();
            Ok(())
        }
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("Roster v{} starting...", env!("CARGO_PKG_VERSION"));

    let port = config.server.port;
    let state = api::create_app_state_from_config(config).await?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 Web server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {e}"),
    }
}

fn print_help() {
    println!("Roster - People Registry Server");
    println!("A self-hosted admin panel for keeping a registry of people");
    println!();
    println!("USAGE:");
    println!("  roster <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("  serve             Start the web server (default)");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("On first start a default 'admin' account is seeded; change");
    println!("its password after signing in for the first time.");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the port, session lifetime,");
    println!("  and database location.");
}
