use agentrelay_core::{OpenAiConfig, OpenAiRuntime};
use agentrelay_server::{AgentHandler, RelayRouter, ServerConfig};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "agentrelay=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let openai = OpenAiConfig::from_env();
    let profiles = args.profiles().map_err(|e| anyhow::anyhow!(e))?;
    let handler_config = args.handler_config();

    let mut router = RelayRouter::new();
    for profile in profiles {
        let runtime = OpenAiRuntime::for_profile(openai.clone(), profile)
            .with_context(|| format!("failed to create runtime for {}", profile))?;
        router = router.with_agent(
            profile.path(),
            AgentHandler::new(runtime).with_config(handler_config),
        );
        tracing::info!(agent = %profile, path = %profile.path(), "mounted agent");
    }
    let app = router.build().context("failed to build router")?;

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    tracing::info!(
        addr = %args.addr,
        model = %openai.model,
        "agentrelay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("agentrelay stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
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
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
