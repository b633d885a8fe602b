//! Tolerant parsing of an externally-sourced grid into candidate records.
//!
//! Headers are matched fuzzily, dates arrive as spreadsheet serials or as
//! strings in assorted formats, and individual bad rows must never abort
//! the batch. Only payload-level and header-level defects fail the whole
//! import.

use crate::error::{Error, Result};
use crate::grid::{Cell, Grid, SourceKind};
use crate::ledger::Ledger;
use crate::model::{Money, Record};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The logical columns a schedule is expected to carry. The enumeration
/// order here is the matching order: when a header could satisfy more than
/// one logical column, the first one in this order claims it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleColumn {
    Date,
    Collected,
    Sold,
    Price,
    ExpenseAmount,
    ExpenseDescription,
}

serde_plain::derive_display_from_serialize!(ScheduleColumn);

/// All logical columns in matching order.
const COLUMNS: [ScheduleColumn; 6] = [
    ScheduleColumn::Date,
    ScheduleColumn::Collected,
    ScheduleColumn::Sold,
    ScheduleColumn::Price,
    ScheduleColumn::ExpenseAmount,
    ScheduleColumn::ExpenseDescription,
];

/// Header resolution succeeds when at least this many logical columns are
/// found, and a data row needs at least this many populated cells to be
/// worth parsing.
const MIN_RESOLVED: usize = 4;

impl ScheduleColumn {
    /// Normalized names this column answers to. Matching is substring
    /// containment in either direction after normalization, so "Date" also
    /// matches "Delivery Date" and "date" matches "Date".
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            ScheduleColumn::Date => &["date"],
            ScheduleColumn::Collected => &["collected"],
            ScheduleColumn::Sold => &["sold"],
            ScheduleColumn::Price => &["price"],
            ScheduleColumn::ExpenseAmount => &["expenseamount", "expenseamt"],
            ScheduleColumn::ExpenseDescription => &["expensedescription", "expensedesc"],
        }
    }

    fn matches(&self, header: &str) -> bool {
        let normalized = normalize(header);
        if normalized.is_empty() {
            return false;
        }
        self.aliases()
            .iter()
            .any(|alias| normalized.contains(alias) || alias.contains(normalized.as_str()))
    }
}

/// Trim, lowercase, strip all whitespace.
fn normalize(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Which grid column index each logical column resolved to.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ColumnMap {
    date: Option<usize>,
    collected: Option<usize>,
    sold: Option<usize>,
    price: Option<usize>,
    expense_amount: Option<usize>,
    expense_description: Option<usize>,
}

impl ColumnMap {
    /// Match the six logical columns against the header row. Each grid
    /// column is claimed at most once, first-match-wins in the fixed
    /// `COLUMNS` order. This is a known-ambiguous heuristic for
    /// pathological header sets; it is deliberately not smarter.
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let mut map = ColumnMap::default();
        let mut claimed = vec![false; headers.len()];

        for column in COLUMNS {
            let found = headers
                .iter()
                .enumerate()
                .find(|(ix, header)| !claimed[*ix] && column.matches(header));
            if let Some((ix, _)) = found {
                claimed[ix] = true;
                let slot = match column {
                    ScheduleColumn::Date => &mut map.date,
                    ScheduleColumn::Collected => &mut map.collected,
                    ScheduleColumn::Sold => &mut map.sold,
                    ScheduleColumn::Price => &mut map.price,
                    ScheduleColumn::ExpenseAmount => &mut map.expense_amount,
                    ScheduleColumn::ExpenseDescription => &mut map.expense_description,
                };
                *slot = Some(ix);
            }
        }

        let matched = map.resolved_count();
        if matched < MIN_RESOLVED {
            return Err(Error::UnrecognizedSchedule {
                matched,
                expected: COLUMNS.len(),
            });
        }
        debug!(matched, "resolved schedule columns");
        Ok(map)
    }

    fn resolved_count(&self) -> usize {
        [
            self.date,
            self.collected,
            self.sold,
            self.price,
            self.expense_amount,
            self.expense_description,
        ]
        .iter()
        .filter(|slot| slot.is_some())
        .count()
    }

    fn cell<'a>(&self, row: &'a [Cell], slot: Option<usize>) -> Option<&'a Cell> {
        row.get(slot?)
    }
}

/// The outcome of parsing a grid: candidate records in row order plus
/// counts for the rows that did not make it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    /// Candidates ready for reconciliation, in source row order.
    pub accepted: Vec<Record>,
    /// Rows silently skipped for having too few populated cells.
    pub skipped: usize,
    /// Rows excluded because their date already exists in the ledger.
    pub duplicates: usize,
}

impl ImportBatch {
    pub fn rejected(&self) -> usize {
        self.skipped + self.duplicates
    }
}

/// Parse a grid into candidate records, screening dates against the current
/// ledger. Duplicate dates *within* the batch are not deduplicated against
/// each other: two rows sharing a date the ledger has never seen are both
/// admitted, and the store-level rule applies only on the next import.
pub fn import_grid(grid: &Grid, ledger: &Ledger) -> Result<ImportBatch> {
    if grid.rows.len() < 2 {
        return Err(Error::MalformedPayload(
            "the grid is header-only or empty".to_string(),
        ));
    }

    let columns = ColumnMap::resolve(&grid.headers())?;
    let mut batch = ImportBatch::default();

    for row in grid.data_rows() {
        let populated = row.iter().filter(|c| !c.is_empty()).count();
        if populated < MIN_RESOLVED {
            batch.skipped += 1;
            continue;
        }

        let record = parse_row(&columns, row, grid.kind);
        if !record.date.is_empty() && ledger.contains_date(&record.date) {
            warn!(date = %record.date, "import row duplicates an existing entry");
            batch.duplicates += 1;
            continue;
        }
        batch.accepted.push(record);
    }

    debug!(
        accepted = batch.accepted.len(),
        skipped = batch.skipped,
        duplicates = batch.duplicates,
        "parsed import grid"
    );
    Ok(batch)
}

/// Build one candidate record. Field-level defects are recovered locally:
/// an undecodable date becomes the empty string and bad numeric cells
/// become zero. The row itself never fails.
fn parse_row(columns: &ColumnMap, row: &[Cell], kind: SourceKind) -> Record {
    let date = columns
        .cell(row, columns.date)
        .map(|cell| decode_date(cell, kind))
        .unwrap_or_default();
    let collected = columns
        .cell(row, columns.collected)
        .map(count_lossy)
        .unwrap_or_default();
    let sold = columns
        .cell(row, columns.sold)
        .map(count_lossy)
        .unwrap_or_default();
    let price = columns
        .cell(row, columns.price)
        .map(money_lossy)
        .unwrap_or_default();
    let expense_amount = columns
        .cell(row, columns.expense_amount)
        .map(money_lossy)
        .unwrap_or_default();
    let expense_description = columns
        .cell(row, columns.expense_description)
        .map(Cell::as_text)
        .unwrap_or_default();

    Record::new(
        date,
        collected,
        sold,
        price,
        expense_amount,
        expense_description.trim(),
    )
}

/// Decode a date cell to ISO `YYYY-MM-DD`.
///
/// A numeric cell greater than 10000 is a spreadsheet date serial. A text
/// cell from a delimited source is parsed against the known formats and
/// reformatted, falling back to empty. A text cell from a spreadsheet
/// source is kept as its trimmed text: the sheet reader has already
/// rendered it.
fn decode_date(cell: &Cell, kind: SourceKind) -> String {
    if let Cell::Number(n) = cell {
        if *n > 10_000.0 {
            return serial_to_iso(*n).unwrap_or_default();
        }
    }
    let text = cell.as_text();
    match kind {
        SourceKind::Spreadsheet => text.trim().to_string(),
        SourceKind::Delimited => parse_date_text(&text).unwrap_or_default(),
    }
}

/// Convert a spreadsheet date serial to an ISO date string.
///
/// The 1900 date system counts from a base of 1899-12-30 (offset 25569 from
/// the Unix epoch) and contains a phantom 1900-02-29 at serial 60, so
/// serials below 60 need a one-day correction: serial 1 is 1900-01-01 and
/// serial 59 is 1900-02-28.
pub fn serial_to_iso(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let mut days = serial.floor() as u64;
    if days < 60 {
        days += 1;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = base.checked_add_days(Days::new(days))?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Date string formats accepted from delimited sources, tried in order.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%d-%m-%Y"];

/// Parse a calendar date string and reformat it to ISO.
pub fn parse_date_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// A count cell: whole non-negative numbers only, anything else is zero.
fn count_lossy(cell: &Cell) -> u32 {
    match cell.as_number() {
        Some(n) if n >= 0.0 && n <= f64::from(u32::MAX) => n.trunc() as u32,
        _ => 0,
    }
}

/// A monetary cell: numeric cells convert directly, text cells parse
/// leniently, anything else is zero.
fn money_lossy(cell: &Cell) -> Money {
    match cell {
        Cell::Number(n) => Decimal::try_from(*n).map(Money::new).unwrap_or_default(),
        Cell::Text(s) => Money::parse_lossy(s),
        Cell::Empty => Money::ZERO,
    }
}
