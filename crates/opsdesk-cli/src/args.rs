use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{BatchArgs, ColumnCommands, DayArgs, EditArgs, ListArgs, ReconfirmArgs};

/// Daily operations reconciliation console for tour reservations
///
/// Opsdesk loads one operation day from the reservation service, flags
/// drivers and guides booked on more than one reservation, saves field edits,
/// reconfirms reservations and runs batch actions such as service orders and
/// confirmation emails.
#[derive(Parser)]
#[command(version, about, name = "opsdesk")]
pub struct Args {
    /// Base URL of the reservation service
    #[arg(long, global = true, env = "OPSDESK_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token sent to the reservation service
    #[arg(long, global = true, env = "OPSDESK_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Read reservations from a JSON file instead of the service. Writes are
    /// applied in memory for the current invocation only.
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Path to the SQLite column preference file. Defaults to
    /// $XDG_DATA_HOME/opsdesk/preferences.db
    #[arg(long, global = true)]
    pub preferences_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the opsdesk CLI
///
/// Without a command the console lists today's reservations.
#[derive(Subcommand)]
pub enum Commands {
    /// List the reservations of an operation day
    #[command(alias = "ls")]
    List(ListArgs),
    /// Show drivers and guides assigned to more than one reservation
    #[command(alias = "c")]
    Conflicts(DayArgs),
    /// Change fields of a reservation and save them in one write
    #[command(alias = "e")]
    Edit(EditArgs),
    /// Reconfirm a reservation, locking it for editing
    Reconfirm(ReconfirmArgs),
    /// Generate service orders for drivers and guides
    #[command(alias = "so")]
    ServiceOrders(BatchArgs),
    /// Email confirmations to customers
    SendConfirmations(BatchArgs),
    /// Show or change column visibility and editability
    Columns {
        #[command(subcommand)]
        command: Option<ColumnCommands>,
    },
}
