//! Command argument wrappers and their handlers.
//!
//! Argument structures carry the clap derives and convert into the
//! framework-free parameters of `opsdesk_core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Console
//! ```
//!
//! Every handler builds a console for one operation day, loads it, runs a
//! single operation and renders the result followed by the notifications the
//! console raised along the way.

use std::{fmt, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use jiff::{civil::Date, Zoned};
use log::{debug, info};
use opsdesk_core::{
    display::OperationDay,
    params::{BatchTarget, EditReservation, PageRequest},
    BatchAction, BatchResult, Column, ColumnSettings, CommitResult, Conflicts, ConsoleBuilder,
    ConsoleFilter, ConsoleTable, EditableField, FieldValue, Notifications, OperationStatus,
    PreferenceStore, ReconciliationConsole, ReconfirmResult, ReservationStatus,
};

use crate::renderer::TerminalRenderer;

// ============================================================================
// CLI Argument Wrapper Implementations
// ============================================================================

/// Reservation status accepted on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Pending,
    Confirmed,
    Reconfirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl fmt::Display for StatusArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&ReservationStatus::from(*self), f)
    }
}

impl From<StatusArg> for ReservationStatus {
    fn from(val: StatusArg) -> Self {
        match val {
            StatusArg::Pending => ReservationStatus::Pending,
            StatusArg::Confirmed => ReservationStatus::Confirmed,
            StatusArg::Reconfirmed => ReservationStatus::Reconfirmed,
            StatusArg::Completed => ReservationStatus::Completed,
            StatusArg::Cancelled => ReservationStatus::Cancelled,
            StatusArg::NoShow => ReservationStatus::NoShow,
        }
    }
}

/// Operation day to load
#[derive(Args, Default)]
pub struct DayArgs {
    /// Operation date (YYYY-MM-DD). Defaults to today
    #[arg(long)]
    pub date: Option<Date>,
}

impl From<&DayArgs> for ConsoleFilter {
    fn from(val: &DayArgs) -> Self {
        ConsoleFilter::for_date(val.date.unwrap_or_else(|| Zoned::now().date()))
    }
}

/// List the reservations of an operation day
///
/// Pending reservations are never shown. Reservations that share a driver or
/// guide with another reservation of the day are listed in the conflict
/// banner above the table.
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub day: DayArgs,
    /// Only show reservations with this status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
    /// Tour name (partial match)
    #[arg(long)]
    pub tour: Option<String>,
    /// Driver name (exact match, case-insensitive)
    #[arg(long)]
    pub driver: Option<String>,
    /// Guide name (exact match, case-insensitive)
    #[arg(long)]
    pub guide: Option<String>,
    /// Operator name (exact match, case-insensitive)
    #[arg(long)]
    pub operator: Option<String>,
    /// Free-text search over ids, names and addresses
    #[arg(short, long)]
    pub search: Option<String>,
    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Rows per page
    #[arg(long, default_value_t = PageRequest::DEFAULT_PER_PAGE)]
    pub per_page: usize,
}

impl Default for ListArgs {
    fn default() -> Self {
        let page = PageRequest::default();
        Self {
            day: DayArgs::default(),
            status: None,
            tour: None,
            driver: None,
            guide: None,
            operator: None,
            search: None,
            page: page.page,
            per_page: page.per_page,
        }
    }
}

impl From<&ListArgs> for ConsoleFilter {
    fn from(val: &ListArgs) -> Self {
        ConsoleFilter {
            status: val.status.map(Into::into),
            tour: val.tour.clone(),
            guide: val.guide.clone(),
            driver: val.driver.clone(),
            operator: val.operator.clone(),
            search: val.search.clone(),
            ..ConsoleFilter::from(&val.day)
        }
    }
}

impl From<&ListArgs> for PageRequest {
    fn from(val: &ListArgs) -> Self {
        PageRequest {
            page: val.page,
            per_page: val.per_page,
        }
    }
}

/// Change fields of a reservation
///
/// All given fields are saved in a single write. An empty value clears a
/// text field. Reconfirmed and finished reservations can no longer be edited.
#[derive(Args)]
pub struct EditArgs {
    /// Reservation id
    pub id: String,
    #[command(flatten)]
    pub day: DayArgs,
    /// Operator name
    #[arg(long)]
    pub operator: Option<String>,
    /// Driver name
    #[arg(long)]
    pub driver: Option<String>,
    /// Guide name
    #[arg(long)]
    pub guide: Option<String>,
    /// Pickup time
    #[arg(long)]
    pub pickup_time: Option<String>,
    /// Pickup address
    #[arg(long)]
    pub pickup_address: Option<String>,
    /// Move the reservation to another operation date (YYYY-MM-DD)
    #[arg(long)]
    pub operation_date: Option<Date>,
    /// New status. Use the reconfirm command to reconfirm
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

impl From<EditArgs> for EditReservation {
    fn from(val: EditArgs) -> Self {
        let text_changes = [
            (EditableField::Operator, val.operator),
            (EditableField::Driver, val.driver),
            (EditableField::Guide, val.guide),
            (EditableField::PickupTime, val.pickup_time),
            (EditableField::PickupAddress, val.pickup_address),
        ];

        let mut edit = EditReservation::new(val.id);
        for (field, value) in text_changes {
            if let Some(value) = value {
                edit = edit.with_change(field, FieldValue::text(value));
            }
        }
        if let Some(date) = val.operation_date {
            edit = edit.with_change(EditableField::OperationDate, FieldValue::Date(date));
        }
        if let Some(status) = val.status {
            edit = edit.with_change(EditableField::Status, FieldValue::Status(status.into()));
        }
        edit
    }
}

/// Reconfirm a reservation
///
/// The operator, driver and guide must be assigned. Unsaved edits are
/// discarded and the reservation is locked afterwards.
#[derive(Args)]
pub struct ReconfirmArgs {
    /// Reservation id
    pub id: String,
    #[command(flatten)]
    pub day: DayArgs,
}

/// Reservations a batch action runs for
#[derive(Args)]
pub struct BatchArgs {
    /// Reservation ids
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub ids: Vec<String>,
    /// Run for every reservation of the day
    #[arg(long)]
    pub all: bool,
    #[command(flatten)]
    pub day: DayArgs,
}

impl From<&BatchArgs> for BatchTarget {
    fn from(val: &BatchArgs) -> Self {
        if val.all {
            BatchTarget::AllVisible
        } else {
            BatchTarget::Ids(val.ids.iter().map(|id| id.as_str().into()).collect())
        }
    }
}

/// Column preference commands
///
/// Columns: booking_id, operation_date, pickup_time, tour, customer,
/// pickup_address, passengers, operator, driver, guide, status, price.
#[derive(Subcommand)]
pub enum ColumnCommands {
    /// Show a column in the table
    Show { column: Column },
    /// Hide a column from the table
    Hide { column: Column },
    /// Make a column read-only
    Lock { column: Column },
    /// Make a column editable again
    Unlock { column: Column },
}

// ============================================================================
// Command Handlers
// ============================================================================

/// Runs one command against a freshly loaded console.
pub struct Cli {
    builder: ConsoleBuilder,
    preferences_file: Option<PathBuf>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(
        builder: ConsoleBuilder,
        preferences_file: Option<PathBuf>,
        renderer: TerminalRenderer,
    ) -> Self {
        Self {
            builder,
            preferences_file,
            renderer,
        }
    }

    /// Builds the console for `filter` and loads its reservations.
    async fn load(builder: ConsoleBuilder, filter: ConsoleFilter) -> Result<ReconciliationConsole> {
        let date = filter.date;
        let session = builder
            .with_filter(filter)
            .build()
            .await
            .context("Failed to initialize console")?;
        let count = session
            .console
            .refresh()
            .await
            .with_context(|| format!("Failed to load reservations for {date}"))?;
        info!("Loaded {count} reservations for {date}");
        Ok(session.console)
    }

    /// Prints the console's notifications, then passes `result` through.
    fn finish<T>(
        renderer: &TerminalRenderer,
        console: &ReconciliationConsole,
        result: opsdesk_core::Result<T>,
    ) -> Result<T> {
        let notifications = console.drain_notifications();
        if !notifications.is_empty() {
            renderer
                .render(&format!("\n{}", Notifications(notifications)))?;
        }
        Ok(result?)
    }

    pub async fn list(self, args: &ListArgs) -> Result<()> {
        let page = PageRequest::from(args);
        let console = Self::load(self.builder, ConsoleFilter::from(args)).await?;

        let filter = console.filter();
        let summary = console.summary();
        let rows = console.page(page.index(), page.per_page);
        debug!("Rendering {} of {} rows", rows.len(), summary.visible);

        let mut output = format!(
            "# Reservations for {}\n\n",
            OperationDay(&filter.date)
        );
        let conflicts = Conflicts(console.conflicts());
        if !conflicts.is_empty() {
            output.push_str(&format!("{conflicts}\n"));
        }
        output.push_str(&ConsoleTable::new(&rows, &console.columns()).to_string());
        output.push_str(&format!(
            "\n*Page {} of {} · {} reservations · {} locked · {} conflicts*\n",
            page.page,
            console.page_count(page.per_page).max(1),
            summary.visible,
            summary.locked,
            summary.conflicts
        ));
        self.renderer.render(&output)?;
        Self::finish(&self.renderer, &console, Ok(()))
    }

    pub async fn conflicts(self, args: &DayArgs) -> Result<()> {
        let console = Self::load(self.builder, ConsoleFilter::from(args)).await?;
        self.renderer
            .render(&Conflicts(console.conflicts()).to_string())?;
        Self::finish(&self.renderer, &console, Ok(()))
    }

    pub async fn edit(self, args: EditArgs) -> Result<()> {
        let filter = ConsoleFilter::from(&args.day);
        let edit = EditReservation::from(args);
        let console = Self::load(self.builder, filter).await?;

        let result = console.apply_edit(&edit).await;
        if let Ok(outcome) = &result {
            self.renderer.render(&CommitResult(outcome).to_string())?;
        }
        Self::finish(&self.renderer, &console, result)
            .with_context(|| format!("Failed to edit reservation {}", edit.id))
            .map(|_| ())
    }

    pub async fn reconfirm(self, args: &ReconfirmArgs) -> Result<()> {
        let console = Self::load(self.builder, ConsoleFilter::from(&args.day)).await?;

        let result = console.reconfirm(&args.id.as_str().into()).await;
        if let Ok(reservation) = &result {
            self.renderer
                .render(&ReconfirmResult(reservation).to_string())?;
        }
        Self::finish(&self.renderer, &console, result)
            .with_context(|| format!("Failed to reconfirm reservation {}", args.id))
            .map(|_| ())
    }

    pub async fn batch(self, action: BatchAction, args: &BatchArgs) -> Result<()> {
        let console = Self::load(self.builder, ConsoleFilter::from(&args.day)).await?;

        let result = match console.select_targets(&BatchTarget::from(args)) {
            Ok(()) => console.run_batch(action).await,
            Err(e) => Err(e),
        };
        if let Ok(outcome) = &result {
            self.renderer.render(&BatchResult(outcome).to_string())?;
        }
        Self::finish(&self.renderer, &console, result)
            .with_context(|| format!("Failed to run {action}"))
            .map(|_| ())
    }

    /// Shows the column preferences, applying `command` first when given.
    ///
    /// Only the local preference file is touched; no reservation source is
    /// needed.
    pub async fn columns(self, command: Option<ColumnCommands>) -> Result<()> {
        let store = PreferenceStore::open(self.preferences_file)
            .await
            .context("Failed to open column preferences")?;
        let mut preferences = store
            .load()
            .await
            .context("Failed to load column preferences")?;

        if let Some(command) = command {
            let message = match command {
                ColumnCommands::Show { column } => {
                    preferences.set_visible(column, true);
                    format!("Column {column} is shown")
                }
                ColumnCommands::Hide { column } => {
                    preferences.set_visible(column, false);
                    format!("Column {column} is hidden")
                }
                ColumnCommands::Lock { column } => {
                    preferences.set_editable(column, false)?;
                    format!("Column {column} is read-only")
                }
                ColumnCommands::Unlock { column } => {
                    preferences.set_editable(column, true)?;
                    format!("Column {column} is editable")
                }
            };
            store
                .save(&preferences)
                .await
                .context("Failed to save column preferences")?;
            self.renderer
                .render(&format!("{}\n", OperationStatus::success(message)))?;
        }

        self.renderer
            .render(&ColumnSettings(&preferences).to_string())
    }
}
