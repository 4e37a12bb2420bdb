use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgGroup, Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "A kanban task board with card reminders", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the board data file (or set TASKBOARD_FILE, or `data_file` in config.toml)
    #[arg(short, long, value_name = "FILE", env = "TASKBOARD_FILE", global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// List operations
    List(ListCommand),
    /// Card operations
    Card(CardCommand),
    /// Apply a drag-end event given as JSON
    Drag(DragArgs),
    /// Reminder checks
    Reminders(RemindersCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a new board
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List all boards
    List,
    /// Get a board with its lists and cards
    Get {
        #[arg(long)]
        id: Uuid,
    },
    /// Update a board
    Update(BoardUpdateArgs),
    /// Delete a board with its lists and cards
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Args)]
pub struct BoardUpdateArgs {
    #[arg(long)]
    pub id: Uuid,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
}

// List commands
#[derive(Args)]
pub struct ListCommand {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Append a list to a board
    Create {
        #[arg(long)]
        board_id: Uuid,
        #[arg(long)]
        title: String,
    },
    /// Rename a list
    Update {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        title: String,
    },
    /// Delete a list with its cards
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Move a list to a zero-based index on its board
    Move {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        index: usize,
    },
}

// Card commands
#[derive(Args)]
pub struct CardCommand {
    #[command(subcommand)]
    pub action: CardAction,
}

#[derive(Subcommand)]
pub enum CardAction {
    /// Append a card to a list
    Create(CardCreateArgs),
    /// Update a card
    Update(CardUpdateArgs),
    /// Delete a card
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Move a card to a zero-based index in a list (end of list by default)
    Move {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        list_id: Uuid,
        #[arg(long)]
        index: Option<usize>,
    },
    /// Set or turn off a card's reminder
    Remind(RemindArgs),
}

#[derive(Args)]
pub struct CardCreateArgs {
    #[arg(long)]
    pub list_id: Uuid,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Reminder time (RFC 3339)
    #[arg(long)]
    pub remind_at: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct CardUpdateArgs {
    #[arg(long)]
    pub id: Uuid,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("when").required(true)))]
pub struct RemindArgs {
    #[arg(long)]
    pub id: Uuid,
    /// Reminder time (RFC 3339)
    #[arg(long, group = "when")]
    pub at: Option<DateTime<Utc>>,
    /// Remind this many minutes from now
    #[arg(long, group = "when")]
    pub in_minutes: Option<i64>,
    /// Turn the reminder off, keeping its date
    #[arg(long, group = "when")]
    pub off: bool,
}

#[derive(Args)]
pub struct DragArgs {
    /// Drag-end event, e.g. {"draggable_id": "...", "type": "card", "source": {...}, "destination": {...}}
    #[arg(long)]
    pub event: String,
}

// Reminder commands
#[derive(Args)]
pub struct RemindersCommand {
    #[command(subcommand)]
    pub action: RemindersAction,
}

#[derive(Subcommand)]
pub enum RemindersAction {
    /// Fire every due reminder on a board once
    Check {
        #[arg(long)]
        board_id: Uuid,
    },
    /// Poll a board for due reminders until Ctrl-C
    Watch {
        #[arg(long)]
        board_id: Uuid,
        /// Poll interval in seconds (defaults to `reminder_poll_secs` in config.toml)
        #[arg(long)]
        interval: Option<u64>,
    },
}
