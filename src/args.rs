//! These structs provide the CLI interface for the coop CLI.

use crate::grid::SourceKind;
use crate::model::Money;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// coop: a command-line daily production and sales ledger.
///
/// Track one entry per day (units collected, units sold, unit price, an
/// expense and its description), see derived revenue/profit and the running
/// balance, import existing spreadsheets or CSV files without creating
/// duplicate days, and export the ledger as CSV, XLSX or a report document.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a new entry for a date.
    Add(EntryArgs),
    /// Replace the entry at a position with new values.
    Edit(EditArgs),
    /// Delete the entry at a position.
    Rm(RmArgs),
    /// Delete every entry and the saved data file.
    Clear,
    /// Print the ledger as a table.
    List,
    /// Print totals across all entries.
    Summary,
    /// Import entries from a spreadsheet or delimited text file.
    Import(ImportArgs),
    /// Export the ledger to a file.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where ledger data is held. Defaults to ~/.coop-ledger
    #[arg(long, env = "COOP_HOME", default_value_t = default_coop_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// The four input fields of a daily entry. Derived fields are always
/// computed; they cannot be supplied here.
#[derive(Debug, Parser, Clone)]
pub struct EntryArgs {
    /// The date of the entry, YYYY-MM-DD.
    #[arg(long)]
    date: String,

    /// Units collected that day.
    #[arg(long, default_value_t = 0)]
    collected: u32,

    /// Units sold that day.
    #[arg(long, default_value_t = 0)]
    sold: u32,

    /// Unit sale price, e.g. 2.50
    #[arg(long, default_value_t = Money::ZERO)]
    price: Money,

    /// The day's aggregated expense, e.g. 1.00
    #[arg(long = "expense", default_value_t = Money::ZERO)]
    expense_amount: Money,

    /// What the expense was for.
    #[arg(long = "expense-desc", default_value = "")]
    expense_description: String,
}

impl EntryArgs {
    pub fn new(
        date: impl Into<String>,
        collected: u32,
        sold: u32,
        price: Money,
        expense_amount: Money,
        expense_description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            collected,
            sold,
            price,
            expense_amount,
            expense_description: expense_description.into(),
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn collected(&self) -> u32 {
        self.collected
    }

    pub fn sold(&self) -> u32 {
        self.sold
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn expense_amount(&self) -> Money {
        self.expense_amount
    }

    pub fn expense_description(&self) -> &str {
        &self.expense_description
    }
}

#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The position to replace, as shown by `coop list` (zero-based).
    index: usize,

    #[clap(flatten)]
    entry: EntryArgs,
}

impl EditArgs {
    pub fn new(index: usize, entry: EntryArgs) -> Self {
        Self { index, entry }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entry(&self) -> &EntryArgs {
        &self.entry
    }
}

#[derive(Debug, Parser, Clone)]
pub struct RmArgs {
    /// The position to delete, as shown by `coop list` (zero-based).
    index: usize,
}

impl RmArgs {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The file to import.
    #[clap(long = "file", short = 'f')]
    file: PathBuf,

    /// The source kind: "spreadsheet" or "delimited". Inferred from the
    /// file extension when omitted.
    #[arg(long)]
    kind: Option<SourceKind>,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>, kind: Option<SourceKind>) -> Self {
        Self {
            file: file.into(),
            kind,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn kind(&self) -> Option<SourceKind> {
        self.kind
    }
}

/// The export encodings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
    Doc,
}

serde_plain::derive_display_from_serialize!(ExportFormat);
serde_plain::derive_fromstr_from_deserialize!(ExportFormat);

#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// The output encoding.
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Where to write the file. Defaults to coop_ledger.<ext> in the
    /// current directory.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(format: ExportFormat, output: Option<PathBuf>) -> Self {
        Self { format, output }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn output(&self) -> Option<&PathBuf> {
        self.output.as_ref()
    }
}

fn default_coop_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join(".coop-ledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or COOP_HOME instead of relying on the default data \
                directory. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from(".coop-ledger")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
