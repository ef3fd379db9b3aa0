//! Post-save signal demo service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ create view ──▶ RecordManager
//!                                   (blocking thread)      │
//!                                                          ├─▶ store insert
//!                                                          │
//!                                                          └─▶ post_save.send
//!                                                                │
//!                                      inline: same thread ◀─────┤
//!                                      background: worker  ◀─────┘
//!     Client Response
//!     ◀────────────── "Model created" (after inline receivers return)
//! ```
//!
//! With the default inline dispatch the slow receiver's delay is paid by
//! every request before the response goes out.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use post_save_demo::config::resolve_config;
use post_save_demo::http::HttpServer;
use post_save_demo::lifecycle::{self, Shutdown};
use post_save_demo::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "post-save-demo")]
#[command(about = "Record service whose post-save handler blocks the request", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = resolve_config(args.config.as_deref(), args.bind)?;

    logging::init(&config.observability);
    tracing::info!("post-save-demo v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        handler_delay_ms = config.signals.handler_delay_ms,
        dispatch = %config.signals.dispatch,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let services = lifecycle::build_services(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::signals::wait_for_termination().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config, services);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
