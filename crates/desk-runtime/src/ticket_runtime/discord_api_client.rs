//! Discord REST API client used by the ticket lifecycle and panel flows.
//!
//! The runtime depends on the [`DiscordApi`] trait so lifecycle behavior is
//! testable with in-process fakes; [`DiscordRestClient`] is the production
//! implementation over the v10 HTTP API with bounded retries.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

const PERMISSION_VIEW_CHANNEL: u64 = 1 << 10;
const PERMISSION_SEND_MESSAGES: u64 = 1 << 11;
const PERMISSION_READ_MESSAGE_HISTORY: u64 = 1 << 16;
const CHANNEL_TYPE_GUILD_TEXT: u8 = 0;
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Channel created for a new ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedChannel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub id: String,
}

/// One fetched channel message, newest-first as the API delivers them.
/// `timestamp_unix_ms` is None when the message id is not a snowflake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: String,
    pub author_tag: String,
    pub content: String,
    pub timestamp_iso: String,
    pub timestamp_unix_ms: Option<u64>,
}

/// Chat-platform operations the ticket runtime needs. Implemented by the
/// REST client in production and by fakes in tests.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    async fn create_ticket_channel(
        &self,
        guild_id: &str,
        name: &str,
        parent_id: &str,
        user_id: &str,
        support_role_id: &str,
    ) -> Result<CreatedChannel>;
    async fn delete_channel(&self, channel_id: &str) -> Result<()>;
    async fn set_channel_parent(&self, channel_id: &str, parent_id: &str) -> Result<()>;
    async fn channel_exists(&self, channel_id: &str) -> Result<bool>;
    async fn post_message(&self, channel_id: &str, payload: Value) -> Result<PostedMessage>;
    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()>;
    async fn post_transcript(
        &self,
        channel_id: &str,
        filename: &str,
        html: &str,
    ) -> Result<PostedMessage>;
    async fn fetch_recent_messages(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<MessageRecord>>;
    async fn respond_to_interaction(
        &self,
        interaction_id: &str,
        token: &str,
        payload: Value,
    ) -> Result<()>;
    async fn edit_original_response(&self, token: &str, payload: Value) -> Result<()>;
    async fn register_commands(&self, commands: Value) -> Result<()>;
}

#[derive(Debug, Clone, Deserialize)]
struct ChannelResponse {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageResponse {
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct FetchedAuthor {
    #[serde(default)]
    username: String,
    #[serde(default)]
    discriminator: String,
}

#[derive(Debug, Clone, Deserialize)]
struct FetchedMessage {
    id: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    timestamp: String,
    author: FetchedAuthor,
}

/// Milliseconds since the unix epoch encoded in a snowflake id.
fn snowflake_unix_ms(id: &str) -> Option<u64> {
    id.parse::<u64>()
        .ok()
        .map(|value| (value >> 22).saturating_add(DISCORD_EPOCH_MS))
}

fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .map(Duration::from_secs_f64)
}

fn retry_delay(base_delay_ms: u64, attempt: usize, retry_after: Option<Duration>) -> Duration {
    if let Some(retry_after) = retry_after {
        return retry_after;
    }
    let shift = attempt.saturating_sub(1).min(6) as u32;
    Duration::from_millis(base_delay_ms.saturating_mul(1_u64 << shift))
}

fn truncate_for_error(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let truncated: String = body.chars().take(max_chars).collect();
    format!("{truncated}…")
}

#[derive(Clone)]
pub struct DiscordRestClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    application_id: String,
    retry_max_attempts: usize,
    retry_base_delay_ms: u64,
}

impl DiscordRestClient {
    pub fn new(
        api_base: String,
        bot_token: String,
        application_id: String,
        request_timeout_ms: u64,
        retry_max_attempts: usize,
        retry_base_delay_ms: u64,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Deskbot (desk-runtime, 0.1)"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create discord api client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.trim().to_string(),
            application_id: application_id.trim().to_string(),
            retry_max_attempts: retry_max_attempts.max(1),
            retry_base_delay_ms: retry_base_delay_ms.max(1),
        })
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.bot_token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    async fn request_json<T, F>(&self, operation: &str, mut builder: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnMut() -> reqwest::RequestBuilder,
    {
        let response = self.request_raw(operation, &mut builder).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode discord {operation} response"))
    }

    async fn request_unit<F>(&self, operation: &str, mut builder: F) -> Result<()>
    where
        F: FnMut() -> reqwest::RequestBuilder,
    {
        self.request_raw(operation, &mut builder).await.map(|_| ())
    }

    async fn request_raw<F>(
        &self,
        operation: &str,
        builder: &mut F,
    ) -> Result<reqwest::Response>
    where
        F: FnMut() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_usize;
        loop {
            attempt = attempt.saturating_add(1);
            let response = builder()
                .header(reqwest::header::AUTHORIZATION, self.auth_header())
                .send()
                .await;
            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    let retry_after = parse_retry_after(response.headers());
                    let body = response.text().await.unwrap_or_default();
                    if attempt < self.retry_max_attempts && is_retryable_status(status.as_u16()) {
                        tokio::time::sleep(retry_delay(
                            self.retry_base_delay_ms,
                            attempt,
                            retry_after,
                        ))
                        .await;
                        continue;
                    }
                    bail!(
                        "discord api {operation} failed with status {}: {}",
                        status.as_u16(),
                        truncate_for_error(&body, 800)
                    );
                }
                Err(error) => {
                    if attempt < self.retry_max_attempts
                        && (error.is_timeout() || error.is_connect())
                    {
                        tokio::time::sleep(retry_delay(self.retry_base_delay_ms, attempt, None))
                            .await;
                        continue;
                    }
                    return Err(error)
                        .with_context(|| format!("discord api {operation} request failed"));
                }
            }
        }
    }
}

#[async_trait]
impl DiscordApi for DiscordRestClient {
    async fn create_ticket_channel(
        &self,
        guild_id: &str,
        name: &str,
        parent_id: &str,
        user_id: &str,
        support_role_id: &str,
    ) -> Result<CreatedChannel> {
        let payload = json!({
            "name": name,
            "type": CHANNEL_TYPE_GUILD_TEXT,
            "parent_id": parent_id,
            "permission_overwrites": [
                {
                    "id": guild_id,
                    "type": 0,
                    "deny": PERMISSION_VIEW_CHANNEL.to_string(),
                },
                {
                    "id": user_id,
                    "type": 1,
                    "allow": (PERMISSION_VIEW_CHANNEL
                        | PERMISSION_SEND_MESSAGES
                        | PERMISSION_READ_MESSAGE_HISTORY)
                        .to_string(),
                },
                {
                    "id": support_role_id,
                    "type": 0,
                    "allow": PERMISSION_VIEW_CHANNEL.to_string(),
                },
            ],
        });
        let url = self.url(&format!("/guilds/{guild_id}/channels"));
        let response: ChannelResponse = self
            .request_json("create channel", || self.http.post(&url).json(&payload))
            .await?;
        Ok(CreatedChannel {
            name: response.name.unwrap_or_else(|| name.to_string()),
            id: response.id,
        })
    }

    async fn delete_channel(&self, channel_id: &str) -> Result<()> {
        let url = self.url(&format!("/channels/{channel_id}"));
        self.request_unit("delete channel", || self.http.delete(&url))
            .await
    }

    async fn set_channel_parent(&self, channel_id: &str, parent_id: &str) -> Result<()> {
        let url = self.url(&format!("/channels/{channel_id}"));
        let payload = json!({ "parent_id": parent_id });
        self.request_unit("modify channel", || self.http.patch(&url).json(&payload))
            .await
    }

    async fn channel_exists(&self, channel_id: &str) -> Result<bool> {
        let url = self.url(&format!("/channels/{channel_id}"));
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .context("discord api get channel request failed")?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if response.status().is_success() {
            return Ok(true);
        }
        bail!(
            "discord api get channel failed with status {}",
            response.status().as_u16()
        );
    }

    async fn post_message(&self, channel_id: &str, payload: Value) -> Result<PostedMessage> {
        let url = self.url(&format!("/channels/{channel_id}/messages"));
        let response: MessageResponse = self
            .request_json("create message", || self.http.post(&url).json(&payload))
            .await?;
        Ok(PostedMessage { id: response.id })
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()> {
        let url = self.url(&format!("/channels/{channel_id}/messages/{message_id}"));
        self.request_unit("delete message", || self.http.delete(&url))
            .await
    }

    async fn post_transcript(
        &self,
        channel_id: &str,
        filename: &str,
        html: &str,
    ) -> Result<PostedMessage> {
        if filename.trim().is_empty() {
            bail!("transcript upload requires a non-empty filename");
        }
        let url = self.url(&format!("/channels/{channel_id}/messages"));
        let payload = json!({
            "attachments": [{ "id": 0, "filename": filename }],
        });
        let filename = filename.to_string();
        let html = html.to_string();
        let response: MessageResponse = self
            .request_json("upload transcript", move || {
                let part = reqwest::multipart::Part::text(html.clone())
                    .file_name(filename.clone())
                    .mime_str("text/html")
                    .unwrap_or_else(|_| {
                        reqwest::multipart::Part::text(html.clone()).file_name(filename.clone())
                    });
                let form = reqwest::multipart::Form::new()
                    .text("payload_json", payload.to_string())
                    .part("files[0]", part);
                self.http.post(&url).multipart(form)
            })
            .await?;
        Ok(PostedMessage { id: response.id })
    }

    async fn fetch_recent_messages(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<MessageRecord>> {
        // The API serves at most 100 messages per page, newest first.
        let limit = limit.max(1);
        let mut fetched: Vec<FetchedMessage> = Vec::new();
        let mut before: Option<String> = None;
        while fetched.len() < limit {
            let page_size = (limit - fetched.len()).min(100);
            let mut url = self.url(&format!(
                "/channels/{channel_id}/messages?limit={page_size}"
            ));
            if let Some(before_id) = &before {
                url.push_str(&format!("&before={before_id}"));
            }
            let page: Vec<FetchedMessage> = self
                .request_json("fetch messages", || self.http.get(&url))
                .await?;
            let exhausted = page.len() < page_size;
            fetched.extend(page);
            if exhausted {
                break;
            }
            before = fetched.last().map(|message| message.id.clone());
        }
        Ok(fetched
            .into_iter()
            .map(|message| {
                let author_tag = if message.author.discriminator.is_empty()
                    || message.author.discriminator == "0"
                {
                    message.author.username.clone()
                } else {
                    format!("{}#{}", message.author.username, message.author.discriminator)
                };
                MessageRecord {
                    timestamp_unix_ms: snowflake_unix_ms(&message.id),
                    id: message.id,
                    author_tag,
                    content: message.content,
                    timestamp_iso: message.timestamp,
                }
            })
            .collect())
    }

    async fn respond_to_interaction(
        &self,
        interaction_id: &str,
        token: &str,
        payload: Value,
    ) -> Result<()> {
        let url = self.url(&format!("/interactions/{interaction_id}/{token}/callback"));
        self.request_unit("interaction callback", || self.http.post(&url).json(&payload))
            .await
    }

    async fn edit_original_response(&self, token: &str, payload: Value) -> Result<()> {
        let url = self.url(&format!(
            "/webhooks/{}/{token}/messages/@original",
            self.application_id
        ));
        self.request_unit("edit interaction response", || {
            self.http.patch(&url).json(&payload)
        })
        .await
    }

    async fn register_commands(&self, commands: Value) -> Result<()> {
        let url = self.url(&format!("/applications/{}/commands", self.application_id));
        self.request_unit("register commands", || self.http.put(&url).json(&commands))
            .await
    }
}

impl DiscordRestClient {
    /// Ensures the application id was supplied before interaction-response
    /// editing or command registration is attempted.
    pub fn require_application_id(&self) -> Result<&str> {
        if self.application_id.is_empty() {
            return Err(anyhow!("discord application id is not configured"));
        }
        Ok(self.application_id.as_str())
    }
}
