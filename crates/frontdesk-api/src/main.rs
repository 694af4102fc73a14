//! Frontdesk CLI and REST API entry point.
//!
//! Binary name: `fdesk`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, ListResource, ShowResource};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; RUST_LOG overrides when set.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,frontdesk=debug",
        _ => "trace",
    };
    let otel = matches!(&cli.command, Commands::Serve { otel: true, .. });
    frontdesk_observe::tracing_setup::init_tracing(otel, filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "fdesk", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (DB, services)
    let state = AppState::init().await?;

    match cli.command {
        Commands::List { resource } => match resource {
            ListResource::Chats { status, limit } => {
                cli::chat::list_chats(&state, status, limit, cli.json).await?;
            }
            ListResource::Callbacks { status, limit } => {
                cli::callback::list_callbacks(&state, status, limit, cli.json).await?;
            }
            ListResource::Leads { limit } => {
                cli::lead::list_leads(&state, limit, cli.json).await?;
            }
        },

        Commands::Show { resource } => match resource {
            ShowResource::Chat { id } => {
                cli::chat::show_chat(&state, &id, cli.json).await?;
            }
            ShowResource::Callback { id } => {
                cli::callback::show_callback(&state, &id, cli.json).await?;
            }
            ShowResource::Lead { id } => {
                cli::lead::show_lead(&state, &id, cli.json).await?;
            }
        },

        Commands::Search { query, limit } => {
            cli::chat::search_chats(&state, &query, limit, cli.json).await?;
            cli::callback::search_callbacks(&state, &query, limit, cli.json).await?;
        }

        Commands::Stats => {
            cli::stats::stats(&state, cli.json).await?;
        }

        Commands::Serve { port, host, .. } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Frontdesk API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
            frontdesk_observe::tracing_setup::shutdown_tracing();
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
