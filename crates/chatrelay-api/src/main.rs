//! chatrelay entry point.
//!
//! Binary name: `chatrelay`
//!
//! Parses CLI arguments, sets up logging, then either runs the relay server
//! or one of the client-side commands.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use clap_complete::generate;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use chatrelay_api::cli::{self, Cli, Commands};
use chatrelay_api::http::router::build_router;
use chatrelay_api::state::AppState;
use chatrelay_infra::config::load_config;
use chatrelay_observe::{LogFormat, filter_for_verbosity, init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need logging or config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatrelay", &mut std::io::stdout());
        return Ok(());
    }

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), format, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let mut config = load_config(cli.config.as_deref()).await?;
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            serve(config).await
        }

        Commands::Chat {
            server,
            session,
            plain,
            delay_ms,
        } => cli::chat::run_chat_loop(&server, session, plain, Duration::from_millis(delay_ms)).await,

        Commands::Format { file } => cli::format::format_file(file.as_deref()).await,

        Commands::Completions { .. } => Ok(()),
    }
}

async fn serve(config: chatrelay_types::config::RelayConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let environment = config.environment.clone();
    let model = config.model.clone();

    let state = AppState::from_config(config)?;
    let cancel = CancellationToken::new();
    let maintenance = state.spawn_maintenance(cancel.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on {addr}");
    info!(%model, "Environment: {environment}");

    let router = build_router(state);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    cancel.cancel();
    for task in maintenance {
        let _ = task.await;
    }

    info!("Server closed");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("SIGTERM received. Shutting down gracefully...");
}
