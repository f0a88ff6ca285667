//! lpx-gw - Launchpad X gateway
//!
//! Bridges the controller's native SysEx/CC protocol with a DAW's custom
//! note/SysEx control protocol.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lpx_gw::bridge::observer::ConsoleObserver;
use lpx_gw::bridge::{Bridge, DeviceSelection};
use lpx_gw::cli;
use lpx_gw::config::AppConfig;
use lpx_gw::transport::midir_backend::MidirBackend;
use lpx_gw::transport;

/// Launchpad X gateway - bridge a grid controller into a DAW's control protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// List available MIDI ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Run without the interactive console (stop with Ctrl+C)
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let backend = Arc::new(MidirBackend::new());

    if args.list_ports {
        transport::list_ports_formatted(backend.as_ref());
        return Ok(());
    }

    info!("Starting lpx-gw...");
    info!("Configuration file: {}", args.config);

    let config = AppConfig::load(&args.config).await?;

    let bridge = Bridge::new(backend.clone());
    bridge.set_observer(Arc::new(ConsoleObserver));
    bridge.set_mode(config.mode);
    bridge.configure(DeviceSelection::from(&config.midi));
    bridge.start();

    if args.headless {
        tokio::signal::ctrl_c().await?;
        info!("Shutdown signal received");
    } else {
        cli::run_repl(&bridge, backend.as_ref()).await?;
    }

    bridge.stop();
    info!("lpx-gw shutdown complete");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
