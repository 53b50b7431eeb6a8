use std::{net::SocketAddr, sync::Arc};

use {
    banter_gateway::AppState,
    banter_provider_settings::{HttpConfiguredProviderClient, ProviderSettingsReconciler},
    banter_providers::ProviderRegistry,
    clap::Parser,
    tracing::info,
    tracing_subscriber::EnvFilter,
};

#[derive(Parser)]
#[command(name = "banter", about = "Banter — AI chat, provider settings layer")]
struct Cli {
    /// Address for the detection endpoint.
    #[arg(long, default_value = "127.0.0.1:7171", env = "BANTER_BIND")]
    bind: SocketAddr,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let registry = Arc::new(ProviderRegistry::new());
    let env_overrides = banter_config::env_overrides();

    let state = AppState::new(Arc::clone(&registry), env_overrides);
    let listener = match tokio::net::TcpListener::bind(cli.bind).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(addr = %cli.bind, error = %error, "failed to bind gateway");
            std::process::exit(1);
        },
    };
    let addr = listener.local_addr().unwrap_or(cli.bind);
    tokio::spawn(async move {
        if let Err(error) = banter_gateway::serve(listener, state).await {
            tracing::error!(error = %error, "gateway exited");
        }
    });

    // Explicit startup sequence: build the working set, then run one awaited
    // auto-enable pass against the live endpoint.
    let detection = Arc::new(HttpConfiguredProviderClient::new(
        format!("http://{addr}"),
        &registry,
    ));
    let reconciler = ProviderSettingsReconciler::new(Arc::clone(&registry), detection);
    reconciler.initialize();
    let flipped = reconciler.auto_enable().await;
    if !flipped.is_empty() {
        info!(providers = ?flipped, "enabled providers detected from environment");
    }

    for (name, settings) in reconciler.settings_map() {
        info!(provider = %name, enabled = settings.enabled, "provider status");
    }

    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
