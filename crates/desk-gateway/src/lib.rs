//! Admin HTTP surface: health probe, dashboard hooks for panel refresh and
//! config reload, and the signed interactions ingress.
//!
//! Every dashboard endpoint answers with a `{"success": ...}` envelope so the
//! caller never has to branch on status codes. The interactions endpoint is
//! the platform-facing exception: it speaks the platform's callback protocol
//! and rejects anything whose ed25519 signature does not verify.

use std::{future::IntoFuture, net::SocketAddr, sync::Arc};

use anyhow::{anyhow, Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use desk_runtime::{pong_response, Interaction, TicketRuntime};
use ed25519_dalek::{Signature, VerifyingKey};
use serde::Deserialize;
use serde_json::{json, Value};

const SIGNATURE_HEADER: &str = "x-signature-ed25519";
const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

pub struct GatewayState {
    runtime: Arc<TicketRuntime>,
    verifying_key: Option<VerifyingKey>,
}

impl GatewayState {
    /// `public_key_hex` is the application public key shown in the developer
    /// portal; without it the interactions endpoint refuses all traffic.
    pub fn new(runtime: Arc<TicketRuntime>, public_key_hex: Option<&str>) -> Result<Self> {
        let verifying_key = match public_key_hex {
            Some(raw) if !raw.trim().is_empty() => Some(parse_public_key(raw.trim())?),
            _ => None,
        };
        Ok(Self {
            runtime,
            verifying_key,
        })
    }
}

fn parse_public_key(raw: &str) -> Result<VerifyingKey> {
    let bytes = hex::decode(raw).context("application public key is not valid hex")?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| anyhow!("application public key must be 32 bytes"))?;
    VerifyingKey::from_bytes(&bytes).context("application public key is not a valid ed25519 key")
}

pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/refreshPanel", post(refresh_panel))
        .route("/reloadConfig", post(reload_config))
        .route("/interactions", post(interactions))
        .with_state(state)
}

/// Binds and serves the admin API until ctrl-c.
pub async fn serve(state: Arc<GatewayState>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind admin api listener on {addr}"))?;
    let local = listener
        .local_addr()
        .context("failed to resolve admin api listener address")?;
    tracing::info!("admin api listening on {local}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .into_future()
        .await
        .context("admin api server failed")
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to install ctrl-c handler: {error}");
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct GuildRequest {
    #[serde(rename = "guildId")]
    guild_id: String,
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

fn failure(error: &str) -> Json<Value> {
    Json(json!({ "success": false, "error": error }))
}

async fn refresh_panel(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<GuildRequest>,
) -> Json<Value> {
    match state.runtime.refresh_panel(&request.guild_id).await {
        Ok(true) => success(),
        Ok(false) => failure("Guild is not configured or the panel channel is invalid."),
        Err(error) => {
            tracing::warn!("panel refresh for {} failed: {error:#}", request.guild_id);
            failure("Panel refresh failed.")
        }
    }
}

async fn reload_config(State(state): State<Arc<GatewayState>>) -> Json<Value> {
    match state.runtime.store().reload() {
        Ok(()) => success(),
        Err(error) => {
            tracing::warn!("config reload failed: {error:#}");
            failure("Config reload failed.")
        }
    }
}

/// Signed interactions ingress. Pings are answered inline; everything else is
/// acknowledged and dispatched to the runtime, which answers through the
/// callback endpoint.
async fn interactions(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(verifying_key) = state.verifying_key.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            failure("Interactions ingress is not configured."),
        )
            .into_response();
    };

    if verify_request(verifying_key, &headers, &body).is_err() {
        return (StatusCode::UNAUTHORIZED, failure("Invalid request signature.")).into_response();
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, failure("Malformed interaction body."))
                .into_response()
        }
    };
    if payload.get("type").and_then(Value::as_u64) == Some(1) {
        return Json(pong_response()).into_response();
    }

    let interaction = match Interaction::from_payload(&payload) {
        Ok(interaction) => interaction,
        Err(error) => {
            tracing::debug!("undecodable interaction dropped: {error:#}");
            return (StatusCode::BAD_REQUEST, failure("Unsupported interaction."))
                .into_response();
        }
    };

    let runtime = state.runtime.clone();
    tokio::spawn(async move {
        if let Err(error) = runtime.handle_interaction(&interaction).await {
            tracing::warn!("interaction handling failed: {error:#}");
        }
    });
    (StatusCode::ACCEPTED, Json(json!({}))).into_response()
}

fn verify_request(key: &VerifyingKey, headers: &HeaderMap, body: &[u8]) -> Result<()> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| anyhow!("missing signature header"))?;
    let timestamp = headers
        .get(TIMESTAMP_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| anyhow!("missing timestamp header"))?;

    let signature_bytes = hex::decode(signature).context("signature is not valid hex")?;
    let signature =
        Signature::from_slice(&signature_bytes).context("signature has the wrong length")?;

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);
    key.verify_strict(&message, &signature)
        .context("signature verification failed")
}
