//! Support ticket bot daemon: wires the config store, the Discord REST
//! client, and the ticket runtime together, then serves the admin API until
//! shutdown.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use desk_config::ConfigStore;
use desk_gateway::GatewayState;
use desk_runtime::{
    panel_command_definitions, start_auto_close_scheduler, DiscordApi, DiscordRestClient,
    TicketRuntime, AUTO_CLOSE_SWEEP_INTERVAL,
};

#[derive(Debug, Parser)]
#[command(name = "desk-bot", about = "Support ticket bot and admin API")]
struct Cli {
    /// Bot token used for all platform REST calls.
    #[arg(long, env = "DISCORD_TOKEN")]
    discord_token: String,

    /// Application id, required for command registration and reply edits.
    #[arg(long, env = "DISCORD_APPLICATION_ID")]
    application_id: String,

    /// Application public key (hex); enables the interactions endpoint.
    #[arg(long, env = "DISCORD_PUBLIC_KEY")]
    public_key: Option<String>,

    /// Port the admin API binds on.
    #[arg(long, env = "BOT_API_PORT", default_value_t = 3001)]
    api_port: u16,

    /// Path of the shared configuration document.
    #[arg(long, env = "DESK_STATE_PATH", default_value = "config.json")]
    state_path: PathBuf,

    /// Platform REST base URL.
    #[arg(long, env = "DISCORD_API_BASE", default_value = "https://discord.com/api/v10")]
    api_base: String,

    /// Per-request timeout for platform REST calls, milliseconds.
    #[arg(long, env = "DISCORD_TIMEOUT_MS", default_value_t = 15_000)]
    request_timeout_ms: u64,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let client = DiscordRestClient::new(
        cli.api_base,
        cli.discord_token,
        cli.application_id,
        cli.request_timeout_ms,
        3,
        500,
    )?;
    client
        .require_application_id()
        .context("set DISCORD_APPLICATION_ID")?;

    let store = Arc::new(
        ConfigStore::open(&cli.state_path)
            .with_context(|| format!("failed to open {}", cli.state_path.display()))?,
    );
    tracing::info!("configuration loaded from {}", cli.state_path.display());

    let api: Arc<dyn DiscordApi> = Arc::new(client.clone());
    let runtime = Arc::new(TicketRuntime::new(store, api));

    // Registration failures are not fatal: already-registered commands keep
    // working and the interactions ingress is independent of it.
    if let Err(error) = client
        .register_commands(panel_command_definitions())
        .await
    {
        tracing::warn!("command registration failed: {error:#}");
    }

    runtime.refresh_all_panels().await;

    let sweeper = start_auto_close_scheduler(runtime.clone(), AUTO_CLOSE_SWEEP_INTERVAL)?;

    let state = Arc::new(GatewayState::new(runtime, cli.public_key.as_deref())?);
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.api_port));
    let served = desk_gateway::serve(state, addr).await;

    sweeper.shutdown().await;
    served
}
