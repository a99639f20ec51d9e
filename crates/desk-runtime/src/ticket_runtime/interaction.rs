//! Inbound interaction model and symbolic action identifiers.
//!
//! The platform delivers interactions as JSON; this module decodes the
//! fields the router needs and maps the custom-id strings onto a tagged
//! action type so dispatch is an exhaustive match instead of string
//! comparisons scattered through one large handler.

use anyhow::{anyhow, Result};
use serde_json::Value;

pub const ACTION_CREATE_BUTTON: &str = "ticket_create_button";
pub const ACTION_CATEGORY_SELECT: &str = "ticket_category_select";
pub const ACTION_PRIORITY_SELECT: &str = "ticket_priority_select";
pub const ACTION_CLAIM: &str = "ticket_claim";
pub const ACTION_CLOSE: &str = "ticket_close";
pub const ACTION_TRANSCRIPT: &str = "ticket_transcript";
pub const ACTION_ARCHIVE: &str = "ticket_archive";

pub const PANEL_COMMAND_NAME: &str = "ticketpanel";

const INTERACTION_TYPE_PING: u64 = 1;
const INTERACTION_TYPE_COMMAND: u64 = 2;
const INTERACTION_TYPE_COMPONENT: u64 = 3;

const PERMISSION_ADMINISTRATOR: u64 = 1 << 3;

/// Per-ticket and wizard controls, parsed from component custom ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketAction {
    CreateButton,
    CategorySelect,
    PrioritySelect,
    Claim,
    Close,
    Transcript,
    Archive,
}

impl TicketAction {
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        match custom_id {
            ACTION_CREATE_BUTTON => Some(Self::CreateButton),
            ACTION_CATEGORY_SELECT => Some(Self::CategorySelect),
            ACTION_PRIORITY_SELECT => Some(Self::PrioritySelect),
            ACTION_CLAIM => Some(Self::Claim),
            ACTION_CLOSE => Some(Self::Close),
            ACTION_TRANSCRIPT => Some(Self::Transcript),
            ACTION_ARCHIVE => Some(Self::Archive),
            _ => None,
        }
    }

    pub fn custom_id(&self) -> &'static str {
        match self {
            Self::CreateButton => ACTION_CREATE_BUTTON,
            Self::CategorySelect => ACTION_CATEGORY_SELECT,
            Self::PrioritySelect => ACTION_PRIORITY_SELECT,
            Self::Claim => ACTION_CLAIM,
            Self::Close => ACTION_CLOSE,
            Self::Transcript => ACTION_TRANSCRIPT,
            Self::Archive => ACTION_ARCHIVE,
        }
    }
}

/// Modes of the administrator `ticketpanel` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    Status,
    Refresh,
    Send,
}

impl PanelCommand {
    pub fn from_subcommand(subcommand: &str) -> Option<Self> {
        match subcommand {
            "status" => Some(Self::Status),
            "refresh" => Some(Self::Refresh),
            "send" => Some(Self::Send),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Ping,
    Command,
    Component,
}

/// Decoded inbound interaction, platform-transport agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub id: String,
    pub token: String,
    pub kind: InteractionKind,
    pub guild_id: Option<String>,
    pub channel_id: Option<String>,
    pub user_id: String,
    pub username: String,
    pub user_is_bot: bool,
    pub member_roles: Vec<String>,
    pub member_is_admin: bool,
    pub custom_id: Option<String>,
    pub values: Vec<String>,
    pub command_name: Option<String>,
    pub subcommand: Option<String>,
}

impl Interaction {
    /// Decodes the wire payload. Fails only on structurally unusable input;
    /// unknown actions are carried through for the router to ignore.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let kind = match payload.get("type").and_then(Value::as_u64) {
            Some(INTERACTION_TYPE_PING) => InteractionKind::Ping,
            Some(INTERACTION_TYPE_COMMAND) => InteractionKind::Command,
            Some(INTERACTION_TYPE_COMPONENT) => InteractionKind::Component,
            other => {
                return Err(anyhow!(
                    "unsupported interaction type {:?}",
                    other
                ))
            }
        };

        let id = string_field(payload, "id");
        let token = string_field(payload, "token");
        if kind != InteractionKind::Ping && (id.is_empty() || token.is_empty()) {
            return Err(anyhow!("interaction payload is missing id or token"));
        }

        let user = payload
            .get("member")
            .and_then(|member| member.get("user"))
            .or_else(|| payload.get("user"))
            .cloned()
            .unwrap_or_default();

        let member_roles = payload
            .get("member")
            .and_then(|member| member.get("roles"))
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let member_is_admin = payload
            .get("member")
            .and_then(|member| member.get("permissions"))
            .and_then(Value::as_str)
            .and_then(|bits| bits.parse::<u64>().ok())
            .map(|bits| bits & PERMISSION_ADMINISTRATOR != 0)
            .unwrap_or(false);

        let data = payload.get("data").cloned().unwrap_or_default();
        let values = data
            .get("values")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let subcommand = data
            .get("options")
            .and_then(Value::as_array)
            .and_then(|options| options.first())
            .and_then(|option| option.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            id,
            token,
            kind,
            guild_id: optional_string_field(payload, "guild_id"),
            channel_id: optional_string_field(payload, "channel_id"),
            user_id: string_field(&user, "id"),
            username: string_field(&user, "username"),
            user_is_bot: user.get("bot").and_then(Value::as_bool).unwrap_or(false),
            member_roles,
            member_is_admin,
            custom_id: optional_string_field(&data, "custom_id"),
            values,
            command_name: optional_string_field(&data, "name"),
            subcommand,
        })
    }

    pub fn action(&self) -> Option<TicketAction> {
        self.custom_id
            .as_deref()
            .and_then(TicketAction::from_custom_id)
    }

    pub fn panel_command(&self) -> Option<PanelCommand> {
        if self.command_name.as_deref() != Some(PANEL_COMMAND_NAME) {
            return None;
        }
        self.subcommand
            .as_deref()
            .and_then(PanelCommand::from_subcommand)
    }

    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    pub fn has_role(&self, role_id: &str) -> bool {
        self.member_roles.iter().any(|role| role == role_id)
    }
}

fn string_field(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn optional_string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|raw| !raw.is_empty())
        .map(str::to_string)
}

/// Command definition payload registered with the platform at startup.
pub fn panel_command_definitions() -> Value {
    serde_json::json!([
        {
            "name": PANEL_COMMAND_NAME,
            "description": "Ticket panel management",
            "options": [
                { "type": 1, "name": "refresh", "description": "Refresh panel" },
                { "type": 1, "name": "send", "description": "Send panel" },
                { "type": 1, "name": "status", "description": "Show panel status" },
            ],
        }
    ])
}
