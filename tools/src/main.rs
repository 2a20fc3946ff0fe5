//! mvp-agents: serve code-review agent tools over stdio
//!
//! stdout carries protocol messages only; all logging goes to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mvp_agents::config::{self, Config, LogFormat};
use mvp_agents::executor::Executor;
use mvp_agents::host::{build_registry, Selection};
use mvp_agents::server::Server;

#[derive(Parser, Debug)]
#[command(name = "mvp-agents", version, about = "Code-review agents served as tools over stdio")]
struct Cli {
    /// Tool set to serve: all, orchestrator, or one agent
    /// (security, best_practices, clean_code, documentation, test_generator)
    #[arg(long, default_value = "all")]
    agent: Selection,

    /// Config file (JSON, or TOML with a .toml extension); falls back to
    /// $MVP_AGENTS_CONFIG, then config/agents.json
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the selected tools as JSON and exit
    #[arg(long)]
    list_tools: bool,
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received SIGINT, shutting down...");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received SIGTERM, shutting down...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = config::load_config(cli.config.as_deref())?;
    init_tracing(&loaded.config);
    loaded.log_summary();
    let config = loaded.config;

    let registry = build_registry(cli.agent, &config).context("Failed to register tools")?;

    if cli.list_tools {
        let listing = serde_json::to_string_pretty(&registry.list_tools())
            .context("Failed to encode tool list")?;
        println!("{listing}");
        return Ok(());
    }

    info!(
        "mvp-agents starting: selection={} tools={} timeout={}ms",
        cli.agent,
        registry.tool_count(),
        config.server.handler_timeout_ms
    );

    let server = Server::new(registry, Executor::with_timeout(config.handler_timeout()))
        .with_name(format!("mvp-agents-{}", cli.agent));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    server
        .serve(stdin, tokio::io::stdout(), shutdown_signal())
        .await
        .context("Serve loop failed")?;

    info!("mvp-agents shut down cleanly");
    Ok(())
}
