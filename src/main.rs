//! Payboard main entry point

use anyhow::Context;
use payboard_api::{start_server, AppState};
use payboard_client::HttpGateway;
use payboard_config::Config;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "payboard")]
#[command(version = "0.1.0")]
#[command(about = "Transaction dashboard backend for payment admins", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = if args.config.exists() {
        Config::load(args.config.clone())
            .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?
    } else {
        Config::default()
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();

    if !args.config.exists() {
        log::warn!(target: "payboard", "Config file {} not found, using defaults", args.config.display());
    }
    log::info!(
        target: "payboard",
        "Config loaded: backend={}, page_size={}",
        config.gateway.base_url,
        config.pagination.page_size
    );

    let gateway = HttpGateway::new(&config.gateway).context("Failed to build backend client")?;
    let rt = Runtime::new()?;

    rt.block_on(async {
        let state = AppState::new(config, Arc::new(gateway));

        match state.refresh().await {
            Ok(count) => log::info!(target: "payboard", "Loaded {} transactions", count),
            Err(e) => log::warn!(target: "payboard", "Initial fetch failed, starting with an empty table: {}", e),
        }

        start_server(state).await.context("Server error")
    })
}
