//! Ticket runtime: routes inbound interactions through the guard layer into
//! the lifecycle state machine, manages the panel message, renders
//! transcripts, and drives the inactivity sweep.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use desk_config::{ConfigStore, Ticket, TicketRegistry, TicketStatus};
use desk_core::{current_unix_timestamp_ms, slug_channel_name};
use serde_json::Value;
use thiserror::Error;

mod auto_close;
mod discord_api_client;
mod guards;
mod interaction;
mod render_helpers;

pub use auto_close::{start_auto_close_scheduler, AutoCloseHandle, SweepReport};
pub use discord_api_client::{
    CreatedChannel, DiscordApi, DiscordRestClient, MessageRecord, PostedMessage,
};
pub use guards::{CooldownGuard, UiDebounceGuard, WizardCache, UI_DEBOUNCE_WINDOW_MS};
pub use interaction::{
    panel_command_definitions, Interaction, InteractionKind, PanelCommand, TicketAction,
    PANEL_COMMAND_NAME,
};
pub use render_helpers::{build_panel, pong_response, render_transcript_html};

use render_helpers::{
    category_select_components, channel_response, edited_reply, ephemeral_components_response,
    ephemeral_response, log_embed, panel_status_embed, priority_select_components,
    ticket_opened_message, update_response,
};

/// Most recent messages included in a transcript; older history is dropped.
pub const TRANSCRIPT_FETCH_LIMIT: usize = 250;
/// Delay between closing a ticket and deleting its channel, so the closing
/// message and transcript stay visible.
pub const CLOSE_GRACE_DELAY: Duration = Duration::from_secs(3);
/// Period of the inactivity sweep.
pub const AUTO_CLOSE_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

const LOG_COLOR: u32 = 0x2f3136;

/// User-visible rejection reasons. Guard and precondition failures are
/// values handled at the point of detection, never errors propagated to the
/// scheduler or the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TicketDenied {
    #[error("This server is not configured yet. Please finish setup in the dashboard.")]
    NotConfigured,
    #[error("You are blacklisted.")]
    Blacklisted,
    #[error("You are on cooldown.")]
    OnCooldown,
    #[error("You already have an open ticket.")]
    AlreadyOpen,
    #[error("No ticket categories configured.")]
    NoCategories,
    #[error("Category missing.")]
    SelectionMissing,
    #[error("Ticket category invalid.")]
    TicketCategoryInvalid,
    #[error("Not a ticket.")]
    NotATicket,
    #[error("No permission.")]
    NoPermission,
    #[error("Admins only.")]
    AdminsOnly,
    #[error("Archive not configured.")]
    ArchiveNotConfigured,
    #[error("Archive invalid.")]
    ArchiveInvalid,
    #[error("Invalid panel channel.")]
    PanelChannelInvalid,
    #[error("Slow down.")]
    TooFast,
}

/// Result of a creation attempt. `Denied` carries the specific rejection
/// reason and guarantees no registry mutation happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(Ticket),
    Denied(TicketDenied),
}

pub struct TicketRuntime {
    store: Arc<ConfigStore>,
    registry: TicketRegistry,
    api: Arc<dyn DiscordApi>,
    cooldowns: CooldownGuard,
    debounce: UiDebounceGuard,
    wizard: WizardCache,
    close_grace: Duration,
}

impl TicketRuntime {
    pub fn new(store: Arc<ConfigStore>, api: Arc<dyn DiscordApi>) -> Self {
        Self {
            registry: TicketRegistry::new(store.clone()),
            store,
            api,
            cooldowns: CooldownGuard::new(),
            debounce: UiDebounceGuard::new(),
            wizard: WizardCache::new(),
            close_grace: CLOSE_GRACE_DELAY,
        }
    }

    /// Shortens the close grace delay; used by tests.
    pub fn with_close_grace(mut self, close_grace: Duration) -> Self {
        self.close_grace = close_grace;
        self
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn registry(&self) -> &TicketRegistry {
        &self.registry
    }

    /// Dispatches one decoded inbound interaction. Rejections are answered
    /// inline; only infrastructure failures surface as errors.
    pub async fn handle_interaction(&self, interaction: &Interaction) -> Result<()> {
        if interaction.kind == InteractionKind::Ping || interaction.user_is_bot {
            return Ok(());
        }
        let Some(guild_id) = interaction.guild_id.clone() else {
            return Ok(());
        };

        match interaction.kind {
            InteractionKind::Component => {
                let now_ms = current_unix_timestamp_ms();
                if self
                    .debounce
                    .is_spam(&guild_id, &interaction.user_id, now_ms)
                {
                    self.respond_best_effort(
                        interaction,
                        ephemeral_response(&TicketDenied::TooFast.to_string()),
                    )
                    .await;
                    return Ok(());
                }
                if !self.store.is_guild_configured(&guild_id)? {
                    self.respond_best_effort(
                        interaction,
                        ephemeral_response(&TicketDenied::NotConfigured.to_string()),
                    )
                    .await;
                    return Ok(());
                }
                match interaction.action() {
                    Some(TicketAction::CreateButton) => {
                        self.show_category_menu(interaction, &guild_id).await
                    }
                    Some(TicketAction::CategorySelect) => {
                        self.handle_category_select(interaction, &guild_id).await
                    }
                    Some(TicketAction::PrioritySelect) => {
                        self.handle_priority_select(interaction, &guild_id).await
                    }
                    Some(TicketAction::Claim) => self.claim_ticket(interaction, &guild_id).await,
                    Some(TicketAction::Close) => self.close_ticket(interaction, &guild_id).await,
                    Some(TicketAction::Transcript) => {
                        self.export_transcript(interaction, &guild_id).await
                    }
                    Some(TicketAction::Archive) => {
                        self.archive_ticket(interaction, &guild_id).await
                    }
                    None => Ok(()),
                }
            }
            InteractionKind::Command => match interaction.panel_command() {
                Some(command) => {
                    self.handle_panel_command(interaction, &guild_id, command)
                        .await
                }
                None => Ok(()),
            },
            InteractionKind::Ping => Ok(()),
        }
    }

    // ---- creation wizard ----

    async fn show_category_menu(&self, interaction: &Interaction, guild_id: &str) -> Result<()> {
        let cfg = self.store.guild(guild_id)?;
        if cfg.categories.is_empty() {
            return self
                .respond(
                    interaction,
                    ephemeral_response(&TicketDenied::NoCategories.to_string()),
                )
                .await;
        }
        self.respond(
            interaction,
            ephemeral_components_response(
                "Choose a category:",
                category_select_components(&cfg.categories),
            ),
        )
        .await
    }

    async fn handle_category_select(
        &self,
        interaction: &Interaction,
        guild_id: &str,
    ) -> Result<()> {
        let Some(category_id) = interaction.first_value().map(str::to_string) else {
            return self
                .respond(
                    interaction,
                    ephemeral_response(&TicketDenied::SelectionMissing.to_string()),
                )
                .await;
        };

        self.wizard
            .set(guild_id, &interaction.user_id, category_id.clone());

        // Priorities default lazily on first use and are persisted.
        let cfg = self.store.guild(guild_id)?;
        let priorities = if cfg.priorities.is_empty() {
            self.store.update_guild(guild_id, |cfg| {
                cfg.priorities = cfg.effective_priorities();
                cfg.priorities.clone()
            })?
        } else {
            cfg.priorities
        };

        self.respond(
            interaction,
            update_response(
                &format!("Category selected: **{category_id}**\nNow choose a priority:"),
                priority_select_components(&priorities),
            ),
        )
        .await
    }

    async fn handle_priority_select(
        &self,
        interaction: &Interaction,
        guild_id: &str,
    ) -> Result<()> {
        let priority = interaction.first_value().unwrap_or("Normal").to_string();
        // Consumed here whatever happens next; a failed attempt must not
        // leave a stale category behind for a later retry.
        let Some(category_id) = self.wizard.take(guild_id, &interaction.user_id) else {
            return self
                .respond(
                    interaction,
                    ephemeral_response(&TicketDenied::SelectionMissing.to_string()),
                )
                .await;
        };

        self.respond(
            interaction,
            update_response("Creating your ticket...", Value::Array(Vec::new())),
        )
        .await?;

        let outcome = self
            .create_ticket(
                guild_id,
                &interaction.user_id,
                &interaction.username,
                &category_id,
                &priority,
                current_unix_timestamp_ms(),
            )
            .await;

        match outcome {
            Ok(CreateOutcome::Created(ticket)) => {
                self.edit_reply_best_effort(
                    interaction,
                    &format!("Your ticket has been created: <#{}>", ticket.channel_id),
                )
                .await;
                Ok(())
            }
            Ok(CreateOutcome::Denied(denied)) => {
                self.edit_reply_best_effort(interaction, &denied.to_string())
                    .await;
                Ok(())
            }
            Err(error) => {
                self.edit_reply_best_effort(interaction, "Ticket creation failed.")
                    .await;
                Err(error)
            }
        }
    }

    // ---- lifecycle state machine ----

    /// Creates a ticket for the user, enforcing the guard preconditions.
    ///
    /// A denied attempt performs no mutation. Once the preconditions pass,
    /// the cooldown and the allocated ticket number stand even if channel
    /// creation fails afterwards: numbering stays monotonic, nothing is
    /// refunded.
    pub async fn create_ticket(
        &self,
        guild_id: &str,
        user_id: &str,
        username: &str,
        category_id: &str,
        priority: &str,
        now_ms: u64,
    ) -> Result<CreateOutcome> {
        let cfg = self.store.guild(guild_id)?;

        if cfg.is_blacklisted(user_id) {
            return Ok(CreateOutcome::Denied(TicketDenied::Blacklisted));
        }
        if self.cooldowns.is_on_cooldown(guild_id, user_id, now_ms) {
            return Ok(CreateOutcome::Denied(TicketDenied::OnCooldown));
        }
        if self.registry.open_count_for_user(guild_id, user_id)? >= 1 {
            return Ok(CreateOutcome::Denied(TicketDenied::AlreadyOpen));
        }

        self.cooldowns.apply(guild_id, user_id, cfg.cooldown, now_ms);
        let ticket_number = self.store.allocate_ticket_number(guild_id)?;

        let Some(parent_id) = cfg.ticket_category_id.as_deref() else {
            return Ok(CreateOutcome::Denied(TicketDenied::TicketCategoryInvalid));
        };
        if !self.api.channel_exists(parent_id).await? {
            return Ok(CreateOutcome::Denied(TicketDenied::TicketCategoryInvalid));
        }
        let support_role_id = cfg.support_role_id.as_deref().unwrap_or_default();

        let channel_name = slug_channel_name(&format!("ticket-{ticket_number}-{username}"));
        let channel = self
            .api
            .create_ticket_channel(guild_id, &channel_name, parent_id, user_id, support_role_id)
            .await
            .context("ticket channel creation failed")?;

        let ticket = Ticket {
            channel_id: channel.id.clone(),
            user_id: user_id.to_string(),
            category_id: category_id.to_string(),
            priority: priority.to_string(),
            ticket_number: ticket_number.clone(),
            created_at: now_ms,
            status: TicketStatus::Open,
            claimed_by: cfg.auto_claim.then(|| user_id.to_string()),
        };
        self.registry.add(guild_id, ticket.clone())?;

        self.api
            .post_message(
                &channel.id,
                ticket_opened_message(
                    user_id,
                    &ticket_number,
                    category_id,
                    priority,
                    cfg.panel_color,
                ),
            )
            .await
            .context("failed to post ticket confirmation")?;

        self.send_log(
            guild_id,
            "Ticket opened",
            &format!("Ticket #{ticket_number} opened by <@{user_id}> in <#{}>.", channel.id),
        )
        .await;

        Ok(CreateOutcome::Created(ticket))
    }

    async fn claim_ticket(&self, interaction: &Interaction, guild_id: &str) -> Result<()> {
        let Some(channel_id) = interaction.channel_id.as_deref() else {
            return Ok(());
        };
        let Some(mut ticket) = self.registry.find_by_channel(guild_id, channel_id)? else {
            return self
                .respond(
                    interaction,
                    ephemeral_response(&TicketDenied::NotATicket.to_string()),
                )
                .await;
        };

        let cfg = self.store.guild(guild_id)?;
        let holds_support_role = cfg
            .support_role_id
            .as_deref()
            .map(|role_id| interaction.has_role(role_id))
            .unwrap_or(false);
        if !holds_support_role {
            return self
                .respond(
                    interaction,
                    ephemeral_response(&TicketDenied::NoPermission.to_string()),
                )
                .await;
        }

        ticket.claimed_by = Some(interaction.user_id.clone());
        ticket.status = TicketStatus::Claimed;
        self.registry.update(guild_id, ticket)?;

        self.respond(
            interaction,
            channel_response(&format!("<@{}> claimed this ticket.", interaction.user_id)),
        )
        .await
    }

    async fn close_ticket(&self, interaction: &Interaction, guild_id: &str) -> Result<()> {
        let Some(channel_id) = interaction.channel_id.as_deref() else {
            return Ok(());
        };
        let Some(ticket) = self.registry.find_by_channel(guild_id, channel_id)? else {
            return self
                .respond(
                    interaction,
                    ephemeral_response(&TicketDenied::NotATicket.to_string()),
                )
                .await;
        };

        let html = self.generate_transcript(channel_id).await?;
        self.api
            .post_transcript(
                channel_id,
                &format!("transcript-{channel_id}.html"),
                &html,
            )
            .await
            .context("failed to post transcript")?;

        // The registry entry is gone before the closing confirmation is
        // sent, and strictly before channel deletion is scheduled.
        self.registry.remove(guild_id, channel_id)?;

        self.respond(interaction, channel_response("Ticket closed.")).await?;

        self.send_log(
            guild_id,
            "Ticket closed",
            &format!(
                "Ticket #{} closed by <@{}>.",
                ticket.ticket_number, interaction.user_id
            ),
        )
        .await;

        let api = self.api.clone();
        let channel_id = channel_id.to_string();
        let close_grace = self.close_grace;
        tokio::spawn(async move {
            tokio::time::sleep(close_grace).await;
            if let Err(error) = api.delete_channel(&channel_id).await {
                tracing::warn!("failed to delete closed ticket channel {channel_id}: {error:#}");
            }
        });
        Ok(())
    }

    async fn archive_ticket(&self, interaction: &Interaction, guild_id: &str) -> Result<()> {
        let Some(channel_id) = interaction.channel_id.as_deref() else {
            return Ok(());
        };
        let Some(ticket) = self.registry.find_by_channel(guild_id, channel_id)? else {
            return self
                .respond(
                    interaction,
                    ephemeral_response(&TicketDenied::NotATicket.to_string()),
                )
                .await;
        };

        let cfg = self.store.guild(guild_id)?;
        let Some(archive_id) = cfg.archive_category_id.as_deref() else {
            return self
                .respond(
                    interaction,
                    ephemeral_response(&TicketDenied::ArchiveNotConfigured.to_string()),
                )
                .await;
        };
        if !self.api.channel_exists(archive_id).await? {
            return self
                .respond(
                    interaction,
                    ephemeral_response(&TicketDenied::ArchiveInvalid.to_string()),
                )
                .await;
        }

        self.api
            .set_channel_parent(channel_id, archive_id)
            .await
            .context("failed to move ticket channel to archive")?;
        self.registry.remove(guild_id, channel_id)?;

        self.respond(interaction, channel_response("Ticket archived."))
            .await?;

        self.send_log(
            guild_id,
            "Ticket archived",
            &format!(
                "Ticket #{} archived by <@{}>.",
                ticket.ticket_number, interaction.user_id
            ),
        )
        .await;
        Ok(())
    }

    async fn export_transcript(&self, interaction: &Interaction, _guild_id: &str) -> Result<()> {
        let Some(channel_id) = interaction.channel_id.as_deref() else {
            return Ok(());
        };
        let html = self.generate_transcript(channel_id).await?;
        self.api
            .post_transcript(
                channel_id,
                &format!("transcript-{channel_id}.html"),
                &html,
            )
            .await
            .context("failed to post transcript")?;
        self.respond(interaction, ephemeral_response("Transcript posted."))
            .await
    }

    /// Renders the channel's bounded recent history, oldest first.
    pub async fn generate_transcript(&self, channel_id: &str) -> Result<String> {
        let mut messages = self
            .api
            .fetch_recent_messages(channel_id, TRANSCRIPT_FETCH_LIMIT)
            .await
            .context("failed to fetch channel history")?;
        // Delivered newest first.
        messages.reverse();
        Ok(render_transcript_html(
            &format!("ticket-{channel_id}"),
            &messages,
        ))
    }

    // ---- panel management ----

    /// Idempotently re-posts the panel message. Returns false when the guild
    /// is not fully configured or the panel channel does not resolve.
    pub async fn refresh_panel(&self, guild_id: &str) -> Result<bool> {
        let cfg = self.store.guild(guild_id)?;
        if !cfg.is_configured() {
            return Ok(false);
        }
        let Some(panel_channel) = cfg.panel_channel_id.clone() else {
            return Ok(false);
        };
        if !self.api.channel_exists(&panel_channel).await? {
            return Ok(false);
        }

        if let Some(old_message) = cfg.panel_message_id.as_deref() {
            if let Err(error) = self.api.delete_message(&panel_channel, old_message).await {
                tracing::debug!("stale panel message not deleted: {error:#}");
            }
        }

        let posted = self
            .api
            .post_message(&panel_channel, build_panel(&cfg))
            .await
            .context("failed to post panel message")?;
        self.store.update_guild(guild_id, |cfg| {
            cfg.panel_message_id = Some(posted.id.clone());
        })?;
        Ok(true)
    }

    /// Posts a fresh panel without touching any prior one. Returns false when
    /// the configured panel channel does not resolve.
    pub async fn send_panel(&self, guild_id: &str) -> Result<bool> {
        let cfg = self.store.guild(guild_id)?;
        let Some(panel_channel) = cfg.panel_channel_id.clone() else {
            return Ok(false);
        };
        if !self.api.channel_exists(&panel_channel).await? {
            return Ok(false);
        }
        self.api
            .post_message(&panel_channel, build_panel(&cfg))
            .await
            .context("failed to post panel message")?;
        Ok(true)
    }

    /// Startup pass: refresh the panel of every guild that finished setup.
    pub async fn refresh_all_panels(&self) {
        let Ok(guild_ids) = self.store.guild_ids() else {
            return;
        };
        for guild_id in guild_ids {
            let Ok(cfg) = self.store.guild(&guild_id) else {
                continue;
            };
            if cfg.panel_channel_id.is_none() || !cfg.settings_complete {
                continue;
            }
            if let Err(error) = self.refresh_panel(&guild_id).await {
                tracing::warn!("startup panel refresh failed for guild {guild_id}: {error:#}");
            }
        }
    }

    async fn handle_panel_command(
        &self,
        interaction: &Interaction,
        guild_id: &str,
        command: PanelCommand,
    ) -> Result<()> {
        if !interaction.member_is_admin {
            return self
                .respond(
                    interaction,
                    ephemeral_response(&TicketDenied::AdminsOnly.to_string()),
                )
                .await;
        }

        match command {
            PanelCommand::Status => {
                let cfg = self.store.guild(guild_id)?;
                self.respond(
                    interaction,
                    serde_json::json!({
                        "type": 4,
                        "data": { "embeds": [panel_status_embed(&cfg)], "flags": 64 },
                    }),
                )
                .await
            }
            PanelCommand::Refresh => {
                self.refresh_panel(guild_id).await?;
                self.respond(interaction, ephemeral_response("Panel refreshed."))
                    .await
            }
            PanelCommand::Send => {
                if self.send_panel(guild_id).await? {
                    self.respond(interaction, ephemeral_response("Panel sent."))
                        .await
                } else {
                    self.respond(
                        interaction,
                        ephemeral_response(&TicketDenied::PanelChannelInvalid.to_string()),
                    )
                    .await
                }
            }
        }
    }

    // ---- inactivity sweep ----

    /// One sweep over every guild's open tickets, closing those whose last
    /// activity is at least the guild's inactivity limit ago. Tickets whose
    /// channel no longer resolves are left for manual cleanup.
    pub async fn run_auto_close_cycle_at(&self, now_ms: u64) -> SweepReport {
        let mut report = SweepReport::default();
        let guild_ids = match self.store.guild_ids() {
            Ok(guild_ids) => guild_ids,
            Err(error) => {
                tracing::warn!("inactivity sweep could not list guilds: {error:#}");
                report.failed = report.failed.saturating_add(1);
                return report;
            }
        };

        for guild_id in guild_ids {
            let cfg = match self.store.guild(&guild_id) {
                Ok(cfg) => cfg,
                Err(error) => {
                    tracing::warn!("inactivity sweep skipped guild {guild_id}: {error:#}");
                    report.failed = report.failed.saturating_add(1);
                    continue;
                }
            };
            let inactivity_limit_ms = cfg.auto_close_hours.saturating_mul(3_600_000);

            for ticket in cfg.open_tickets {
                report.scanned = report.scanned.saturating_add(1);
                match self.api.channel_exists(&ticket.channel_id).await {
                    Ok(true) => {}
                    Ok(false) => {
                        report.skipped_missing_channel =
                            report.skipped_missing_channel.saturating_add(1);
                        continue;
                    }
                    Err(error) => {
                        tracing::warn!(
                            "inactivity sweep could not resolve channel {}: {error:#}",
                            ticket.channel_id
                        );
                        report.failed = report.failed.saturating_add(1);
                        continue;
                    }
                }

                let last_activity_ms = match self
                    .api
                    .fetch_recent_messages(&ticket.channel_id, 1)
                    .await
                {
                    // A message whose id carries no timestamp must not read
                    // as epoch-old activity, so fall back to creation time.
                    Ok(messages) => messages
                        .first()
                        .and_then(|message| message.timestamp_unix_ms)
                        .unwrap_or(ticket.created_at),
                    Err(error) => {
                        tracing::warn!(
                            "inactivity sweep could not fetch history for {}: {error:#}",
                            ticket.channel_id
                        );
                        report.failed = report.failed.saturating_add(1);
                        continue;
                    }
                };

                if now_ms.saturating_sub(last_activity_ms) < inactivity_limit_ms {
                    continue;
                }

                if let Err(error) = self
                    .api
                    .post_message(
                        &ticket.channel_id,
                        channel_notice("Ticket closed due to inactivity."),
                    )
                    .await
                {
                    tracing::warn!(
                        "inactivity notice failed for {}: {error:#}",
                        ticket.channel_id
                    );
                    report.failed = report.failed.saturating_add(1);
                    continue;
                }
                if let Err(error) = self.api.delete_channel(&ticket.channel_id).await {
                    tracing::warn!(
                        "inactivity close could not delete {}: {error:#}",
                        ticket.channel_id
                    );
                    report.failed = report.failed.saturating_add(1);
                    continue;
                }
                if let Err(error) = self.registry.remove(&guild_id, &ticket.channel_id) {
                    tracing::warn!(
                        "inactivity close could not deregister {}: {error:#}",
                        ticket.channel_id
                    );
                    report.failed = report.failed.saturating_add(1);
                    continue;
                }
                report.closed = report.closed.saturating_add(1);

                self.send_log(
                    &guild_id,
                    "Ticket auto-closed",
                    &format!("Ticket #{} closed due to inactivity.", ticket.ticket_number),
                )
                .await;
            }
        }
        report
    }

    pub async fn run_auto_close_cycle(&self) -> SweepReport {
        self.run_auto_close_cycle_at(current_unix_timestamp_ms()).await
    }

    // ---- plumbing ----

    async fn respond(&self, interaction: &Interaction, payload: Value) -> Result<()> {
        self.api
            .respond_to_interaction(&interaction.id, &interaction.token, payload)
            .await
    }

    async fn respond_best_effort(&self, interaction: &Interaction, payload: Value) {
        if let Err(error) = self.respond(interaction, payload).await {
            tracing::debug!("interaction reply not delivered: {error:#}");
        }
    }

    async fn edit_reply_best_effort(&self, interaction: &Interaction, content: &str) {
        if let Err(error) = self
            .api
            .edit_original_response(&interaction.token, edited_reply(content))
            .await
        {
            tracing::debug!("interaction reply edit not delivered: {error:#}");
        }
    }

    /// Best-effort delivery of a log embed to the guild's log channel.
    async fn send_log(&self, guild_id: &str, title: &str, description: &str) {
        let Ok(cfg) = self.store.guild(guild_id) else {
            return;
        };
        let Some(log_channel) = cfg.log_channel_id else {
            return;
        };
        if let Err(error) = self
            .api
            .post_message(&log_channel, log_embed(title, description, LOG_COLOR))
            .await
        {
            tracing::debug!("log delivery to {log_channel} failed: {error:#}");
        }
    }
}

fn channel_notice(content: &str) -> Value {
    serde_json::json!({ "content": content })
}
