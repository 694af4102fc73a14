//! Lead CLI commands: list, show.

use anyhow::Result;
use comfy_table::{presets, Cell, ContentArrangement, Table};
use console::style;

use crate::state::AppState;

/// List leads.
pub async fn list_leads(state: &AppState, limit: i64, json: bool) -> Result<()> {
    let leads = state.lead_service.list_leads(Some(limit), None).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&leads)?);
        return Ok(());
    }

    if leads.is_empty() {
        println!();
        println!("  No leads found.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Phone", "Email", "Company", "Created"]);

    for lead in &leads {
        table.add_row(vec![
            Cell::new(&lead.name),
            Cell::new(lead.phone.as_deref().unwrap_or("-")),
            Cell::new(lead.email.as_deref().unwrap_or("-")),
            Cell::new(lead.company.as_deref().unwrap_or("-")),
            Cell::new(super::format_relative_time(&lead.created_at)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} lead{}",
        style(leads.len()).bold(),
        if leads.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show one lead in full.
pub async fn show_lead(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = id.parse().map_err(|_| anyhow::anyhow!("Invalid UUID: {id}"))?;
    let lead = state.lead_service.get_lead(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lead)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("Lead").bold(), style(&lead.name).cyan());
    println!();
    if let Some(phone) = &lead.phone {
        println!("  {}   {}", style("Phone:").bold(), phone);
    }
    if let Some(email) = &lead.email {
        println!("  {}   {}", style("Email:").bold(), email);
    }
    if let Some(company) = &lead.company {
        println!("  {} {}", style("Company:").bold(), company);
    }
    if !lead.tags.is_empty() {
        println!("  {}    {}", style("Tags:").bold(), lead.tags.join(", "));
    }
    println!(
        "  {}      {}",
        style("ID:").bold(),
        style(lead.id.to_string()).dim()
    );
    println!();

    Ok(())
}
