//! Conversation CLI commands: list, show, search.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use frontdesk_types::chat::{Chat, ChatStatus};
use frontdesk_types::filter::ChatFilter;

use crate::state::AppState;

/// List conversations, optionally restricted to a status set.
pub async fn list_chats(
    state: &AppState,
    status: Option<String>,
    limit: i64,
    json: bool,
) -> Result<()> {
    let mut filter = ChatFilter::default();
    if let Some(raw) = status {
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let parsed: ChatStatus = part.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            filter.status.push(parsed);
        }
    }

    let chats = state
        .chat_service
        .list_chats(&filter, Some(limit), None)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chats)?);
        return Ok(());
    }

    if chats.is_empty() {
        println!();
        println!("  No conversations found.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Session", "Status", "Priority", "Type", "Msgs", "Last activity",
    ]);

    for chat in &chats {
        table.add_row(vec![
            Cell::new(&chat.chat_session_id),
            status_cell(&chat.status),
            Cell::new(chat.priority.to_string()),
            Cell::new(chat.chat_type.to_string()),
            Cell::new(chat.message_count.to_string()),
            Cell::new(super::format_relative_time(&chat.last_activity_at)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation{}",
        style(chats.len()).bold(),
        if chats.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show one conversation in full.
pub async fn show_chat(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = id.parse().map_err(|_| anyhow::anyhow!("Invalid UUID: {id}"))?;
    let chat = state.chat_service.get_chat(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chat)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("Conversation").bold(),
        style(&chat.chat_session_id).cyan()
    );
    println!();
    println!("  {}    {}", style("Status:").bold(), chat.status);
    println!("  {}  {}", style("Priority:").bold(), chat.priority);
    println!("  {}      {}", style("Type:").bold(), chat.chat_type);
    if let Some(source) = &chat.source {
        println!("  {}    {}", style("Source:").bold(), source);
    }
    if !chat.tags.is_empty() {
        println!("  {}      {}", style("Tags:").bold(), chat.tags.join(", "));
    }
    println!(
        "  {}   {} ({} messages)",
        style("Opened:").bold(),
        chat.started_at.format("%Y-%m-%d %H:%M UTC"),
        chat.message_count
    );
    if let Some(intent) = &chat.customer_intent {
        println!("  {}    {}", style("Intent:").bold(), intent);
    }
    if let Some(resolution) = &chat.resolution_status {
        println!("  {} {}", style("Resolved:").bold(), resolution);
    }
    println!(
        "  {}        {}",
        style("ID:").bold(),
        style(chat.id.to_string()).dim()
    );
    println!();

    Ok(())
}

/// Search conversations and print matches.
pub async fn search_chats(state: &AppState, query: &str, limit: i64, json: bool) -> Result<()> {
    let hits = state.chat_service.search_chats(query, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} conversation match{}",
        style(hits.len()).bold(),
        if hits.len() == 1 { "" } else { "es" }
    );
    for hit in &hits {
        let chat: &Chat = &hit.item;
        println!(
            "    {} {} ({}, {})",
            style("•").dim(),
            style(&chat.chat_session_id).cyan(),
            chat.status,
            super::format_relative_time(&chat.last_activity_at)
        );
    }
    println!();

    Ok(())
}

fn status_cell(status: &ChatStatus) -> Cell {
    let cell = Cell::new(status.to_string());
    match status {
        ChatStatus::Active => cell.fg(Color::Green),
        ChatStatus::Paused => cell.fg(Color::Yellow),
        ChatStatus::Transferred => cell.fg(Color::Cyan),
        ChatStatus::Abandoned => cell.fg(Color::Red),
        ChatStatus::Closed => cell.fg(Color::DarkGrey),
    }
}
