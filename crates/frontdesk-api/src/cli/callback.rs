//! Callback queue CLI commands: list, show, search.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use frontdesk_types::callback::{Callback, CallbackStatus};
use frontdesk_types::filter::CallbackFilter;

use crate::state::AppState;

/// List callback requests, optionally restricted to a status set.
pub async fn list_callbacks(
    state: &AppState,
    status: Option<String>,
    limit: i64,
    json: bool,
) -> Result<()> {
    let mut filter = CallbackFilter::default();
    if let Some(raw) = status {
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let parsed: CallbackStatus = part.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            filter.status.push(parsed);
        }
    }

    let callbacks = state
        .callback_service
        .list_callbacks(&filter, Some(limit), None)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&callbacks)?);
        return Ok(());
    }

    if callbacks.is_empty() {
        println!();
        println!("  No callbacks found.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Client", "Phone", "Status", "Urgency", "Prio", "Attempts", "Created",
    ]);

    for callback in &callbacks {
        table.add_row(vec![
            Cell::new(&callback.client_name),
            Cell::new(&callback.client_phone),
            status_cell(&callback.status),
            Cell::new(callback.urgency.to_string()),
            Cell::new(callback.priority.to_string()),
            Cell::new(callback.attempt_count.to_string()),
            Cell::new(super::format_relative_time(&callback.created_at)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} callback{}",
        style(callbacks.len()).bold(),
        if callbacks.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show one callback in full.
pub async fn show_callback(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = id.parse().map_err(|_| anyhow::anyhow!("Invalid UUID: {id}"))?;
    let callback = state.callback_service.get_callback(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&callback)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("Callback for").bold(),
        style(&callback.client_name).cyan()
    );
    println!();
    println!("  {}     {}", style("Phone:").bold(), callback.client_phone);
    if let Some(email) = &callback.client_email {
        println!("  {}     {}", style("Email:").bold(), email);
    }
    if let Some(company) = &callback.company_name {
        println!("  {}   {}", style("Company:").bold(), company);
    }
    println!("  {}    {}", style("Status:").bold(), callback.status);
    println!("  {}   {}", style("Urgency:").bold(), callback.urgency);
    println!("  {}  {}", style("Priority:").bold(), callback.priority);
    println!(
        "  {}  {}",
        style("Window:").bold(),
        callback.preferred_time_range
    );
    if let Some(scheduled_at) = &callback.scheduled_at {
        println!(
            "  {} {}",
            style("Scheduled:").bold(),
            scheduled_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    println!(
        "  {}  {}",
        style("Attempts:").bold(),
        callback.attempt_count
    );
    if let Some(outcome) = &callback.outcome {
        println!("  {}   {}", style("Outcome:").bold(), outcome);
    }
    println!(
        "  {}        {}",
        style("ID:").bold(),
        style(callback.id.to_string()).dim()
    );
    println!();

    Ok(())
}

/// Search callbacks and print matches.
pub async fn search_callbacks(state: &AppState, query: &str, limit: i64, json: bool) -> Result<()> {
    let hits = state.callback_service.search_callbacks(query, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} callback match{}",
        style(hits.len()).bold(),
        if hits.len() == 1 { "" } else { "es" }
    );
    for hit in &hits {
        let callback: &Callback = &hit.item;
        println!(
            "    {} {} ({}, {})",
            style("•").dim(),
            style(&callback.client_name).cyan(),
            callback.status,
            callback.client_phone
        );
    }
    println!();

    Ok(())
}

fn status_cell(status: &CallbackStatus) -> Cell {
    let cell = Cell::new(status.to_string());
    match status {
        CallbackStatus::Pending => cell.fg(Color::Yellow),
        CallbackStatus::Scheduled => cell.fg(Color::Cyan),
        CallbackStatus::Completed => cell.fg(Color::Green),
        CallbackStatus::Cancelled => cell.fg(Color::DarkGrey),
        CallbackStatus::NoAnswer => cell.fg(Color::Red),
    }
}
