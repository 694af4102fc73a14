//! Dashboard statistics command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display the combined conversation and callback dashboard.
pub async fn stats(state: &AppState, json: bool) -> Result<()> {
    let chats = state.chat_service.chat_stats().await?;
    let callbacks = state.callback_service.callback_stats().await?;

    if json {
        let combined = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "chats": chats,
            "callbacks": callbacks,
        });
        println!("{}", serde_json::to_string_pretty(&combined)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Frontdesk v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Conversations ──").dim());
    println!("  Total:       {}", style(chats.total).bold());
    println!("  Active:      {}", style(chats.by_status.active).green());
    if chats.by_status.paused > 0 {
        println!("  Paused:      {}", style(chats.by_status.paused).yellow());
    }
    println!("  Closed:      {}", style(chats.by_status.closed).dim());
    if chats.by_status.abandoned > 0 {
        println!("  Abandoned:   {}", style(chats.by_status.abandoned).red());
    }
    println!(
        "  Resolution:  {:.1}%  ({} follow-ups pending)",
        chats.resolution_rate, chats.follow_ups_required
    );
    println!(
        "  Avg length:  {:.1} messages over {:.0}s",
        chats.average_messages, chats.average_duration_seconds
    );
    if chats.average_satisfaction > 0.0 {
        println!("  Satisfaction: {:.2}/5", chats.average_satisfaction);
    }
    println!();

    println!("  {}", style("── Callbacks ──").dim());
    println!("  Total:       {}", style(callbacks.total).bold());
    println!(
        "  Pending:     {}",
        style(callbacks.by_status.pending).yellow()
    );
    println!(
        "  Scheduled:   {}",
        style(callbacks.by_status.scheduled).cyan()
    );
    println!(
        "  Completed:   {}",
        style(callbacks.by_status.completed).green()
    );
    if callbacks.by_status.no_answer > 0 {
        println!(
            "  No answer:   {}",
            style(callbacks.by_status.no_answer).red()
        );
    }
    println!(
        "  Completion:  {:.1}%  ({:.1} attempts avg)",
        callbacks.completion_rate, callbacks.average_attempts
    );
    println!();

    println!(
        "  Data dir: {}",
        style(state.data_dir.display().to_string()).dim()
    );
    println!();

    Ok(())
}
