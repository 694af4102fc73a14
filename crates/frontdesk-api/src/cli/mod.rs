//! CLI command definitions and dispatch for the `fdesk` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `fdesk list chats`, `fdesk show callback <id>`).

pub mod callback;
pub mod chat;
pub mod lead;
pub mod stats;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Manage your front-desk conversation and callback queue.
#[derive(Parser)]
#[command(name = "fdesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Show details of a single resource.
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },

    /// Text search over chats and callbacks.
    Search {
        /// Search text (matched case-insensitively).
        query: String,

        /// Maximum hits per resource.
        #[arg(long, default_value = "20")]
        limit: i64,
    },

    /// Dashboard statistics.
    Stats,

    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,

        /// Emit OpenTelemetry spans to stdout.
        #[arg(long)]
        otel: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List conversations.
    Chats {
        /// Only show conversations with these statuses (comma-separated).
        #[arg(long)]
        status: Option<String>,

        /// Maximum rows to display.
        #[arg(long, default_value = "50")]
        limit: i64,
    },

    /// List callback requests.
    Callbacks {
        /// Only show callbacks with these statuses (comma-separated).
        #[arg(long)]
        status: Option<String>,

        /// Maximum rows to display.
        #[arg(long, default_value = "50")]
        limit: i64,
    },

    /// List leads.
    Leads {
        /// Maximum rows to display.
        #[arg(long, default_value = "50")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum ShowResource {
    /// Show a conversation by id.
    Chat {
        /// Conversation id (UUID).
        id: String,
    },

    /// Show a callback by id.
    Callback {
        /// Callback id (UUID).
        id: String,
    },

    /// Show a lead by id.
    Lead {
        /// Lead id (UUID).
        id: String,
    },
}

/// Humanized "3h ago" rendering for table columns.
pub(crate) fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let delta = chrono::Utc::now().signed_duration_since(*dt);
    if delta.num_seconds() < 60 {
        "just now".to_string()
    } else if delta.num_minutes() < 60 {
        format!("{}m ago", delta.num_minutes())
    } else if delta.num_hours() < 24 {
        format!("{}h ago", delta.num_hours())
    } else {
        format!("{}d ago", delta.num_days())
    }
}
