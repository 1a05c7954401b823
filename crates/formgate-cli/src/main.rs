//! formgate — realtime session gateway for agent-driven form filling
//!
//! Usage:
//!   formgate [--host 0.0.0.0] [--port 8000] [--clear-on-submit]
//!
//! Host and port fall back to FORMGATE_HOST / FORMGATE_PORT, then to
//! the built-in defaults.

use anyhow::Result;
use clap::Parser;
use formgate_gateway::{ServerConfig, SubmitPolicy, start};

#[derive(Parser, Debug)]
#[command(name = "formgate", about = "Realtime form session gateway", version)]
struct Args {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Drop the current-form pointer after a successful submit
    #[arg(long)]
    clear_on_submit: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.clear_on_submit {
        config.submit_policy = SubmitPolicy::Clear;
    }

    let handle = start(config).await?;
    tracing::info!(port = handle.port, "formgate running, ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    Ok(())
}
