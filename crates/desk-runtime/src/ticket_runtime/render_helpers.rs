//! Pure payload builders for panel, wizard, ticket, and log messages, plus
//! the transcript HTML renderer. Nothing here performs I/O.

use desk_config::{GuildConfig, TicketCategory};
use serde_json::{json, Value};

use super::discord_api_client::MessageRecord;
use super::interaction::{
    ACTION_CATEGORY_SELECT, ACTION_CREATE_BUTTON, ACTION_PRIORITY_SELECT,
};

const MESSAGE_FLAG_EPHEMERAL: u64 = 1 << 6;
const RESPONSE_TYPE_PONG: u64 = 1;
const RESPONSE_TYPE_MESSAGE: u64 = 4;
const RESPONSE_TYPE_UPDATE_MESSAGE: u64 = 7;
const BUTTON_STYLE_PRIMARY: u64 = 1;

/// Panel presentation payload: embed plus the single create-ticket button.
pub fn build_panel(cfg: &GuildConfig) -> Value {
    json!({
        "embeds": [{
            "title": cfg.panel_title,
            "description": cfg.panel_description,
            "color": cfg.panel_color,
        }],
        "components": [{
            "type": 1,
            "components": [{
                "type": 2,
                "style": BUTTON_STYLE_PRIMARY,
                "label": cfg.panel_button_text,
                "custom_id": ACTION_CREATE_BUTTON,
            }],
        }],
    })
}

pub fn category_select_components(categories: &[TicketCategory]) -> Value {
    json!([{
        "type": 1,
        "components": [{
            "type": 3,
            "custom_id": ACTION_CATEGORY_SELECT,
            "placeholder": "Select a category",
            "options": categories
                .iter()
                .map(|category| json!({ "label": category.name, "value": category.id }))
                .collect::<Vec<_>>(),
        }],
    }])
}

pub fn priority_select_components(priorities: &[String]) -> Value {
    json!([{
        "type": 1,
        "components": [{
            "type": 3,
            "custom_id": ACTION_PRIORITY_SELECT,
            "placeholder": "Select ticket priority",
            "options": priorities
                .iter()
                .map(|priority| json!({ "label": priority, "value": priority }))
                .collect::<Vec<_>>(),
        }],
    }])
}

pub fn pong_response() -> Value {
    json!({ "type": RESPONSE_TYPE_PONG })
}

/// Reply visible only to the invoking user.
pub fn ephemeral_response(content: &str) -> Value {
    json!({
        "type": RESPONSE_TYPE_MESSAGE,
        "data": { "content": content, "flags": MESSAGE_FLAG_EPHEMERAL },
    })
}

pub fn ephemeral_components_response(content: &str, components: Value) -> Value {
    json!({
        "type": RESPONSE_TYPE_MESSAGE,
        "data": {
            "content": content,
            "components": components,
            "flags": MESSAGE_FLAG_EPHEMERAL,
        },
    })
}

/// Reply posted into the channel for everyone.
pub fn channel_response(content: &str) -> Value {
    json!({
        "type": RESPONSE_TYPE_MESSAGE,
        "data": { "content": content },
    })
}

/// Replaces the message the component interaction came from.
pub fn update_response(content: &str, components: Value) -> Value {
    json!({
        "type": RESPONSE_TYPE_UPDATE_MESSAGE,
        "data": { "content": content, "components": components },
    })
}

pub fn edited_reply(content: &str) -> Value {
    json!({ "content": content, "components": [] })
}

/// Mention plus summary embed posted into a freshly created ticket channel.
pub fn ticket_opened_message(
    user_id: &str,
    ticket_number: &str,
    category_id: &str,
    priority: &str,
    color: u32,
) -> Value {
    json!({
        "content": format!("<@{user_id}> your ticket has been created."),
        "embeds": [{
            "title": format!("Ticket #{ticket_number}"),
            "description": format!("Category: **{category_id}**\nPriority: **{priority}**"),
            "color": color,
        }],
    })
}

pub fn panel_status_embed(cfg: &GuildConfig) -> Value {
    let category_names = if cfg.categories.is_empty() {
        "None".to_string()
    } else {
        cfg.categories
            .iter()
            .map(|category| category.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let priorities = if cfg.priorities.is_empty() {
        "None".to_string()
    } else {
        cfg.priorities.join(", ")
    };
    json!({
        "title": "Ticket Panel Status",
        "color": cfg.panel_color,
        "fields": [
            { "name": "Panel Channel", "value": channel_reference(cfg.panel_channel_id.as_deref()) },
            { "name": "Ticket Category", "value": channel_reference(cfg.ticket_category_id.as_deref()) },
            { "name": "Support Role", "value": role_reference(cfg.support_role_id.as_deref()) },
            { "name": "Categories", "value": category_names },
            { "name": "Priorities", "value": priorities },
        ],
    })
}

pub fn log_embed(title: &str, description: &str, color: u32) -> Value {
    json!({
        "embeds": [{ "title": title, "description": description, "color": color }],
    })
}

fn channel_reference(channel_id: Option<&str>) -> String {
    match channel_id {
        Some(id) => format!("<#{id}>"),
        None => "None".to_string(),
    }
}

fn role_reference(role_id: Option<&str>) -> String {
    match role_id {
        Some(id) => format!("<@&{id}>"),
        None => "None".to_string(),
    }
}

fn html_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Renders the bounded message history into a self-contained HTML document.
/// `messages` must already be ordered oldest first.
pub fn render_transcript_html(channel_name: &str, messages: &[MessageRecord]) -> String {
    let title = html_escape(channel_name);
    let mut html = format!(
        "<html><head><meta charset=\"UTF-8\"><title>{title}</title>\n\
         <style>body{{background:#1e1e1e;color:white;font-family:Arial;padding:20px;}}\n\
         .msg{{margin-bottom:12px;}}.author{{color:#4ea1ff;font-weight:bold;}}\n\
         .timestamp{{color:#aaa;font-size:12px;}}.content{{margin-top:4px;}}\n\
         </style></head><body><h1>Transcript - {title}</h1><hr>"
    );

    for message in messages {
        let content = if message.content.is_empty() {
            "<i>No content</i>".to_string()
        } else {
            html_escape(&message.content)
        };
        html.push_str(&format!(
            "<div class=\"msg\">\
             <div class=\"author\">{}</div>\
             <div class=\"timestamp\">{}</div>\
             <div class=\"content\">{content}</div>\
             </div>",
            html_escape(&message.author_tag),
            html_escape(&message.timestamp_iso),
        ));
    }

    html.push_str("</body></html>");
    html
}
