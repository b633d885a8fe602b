//! Read-only handlers: list and summary.

use crate::commands::Out;
use crate::export::EXPORT_HEADERS;
use crate::model::Record;
use crate::persist::{self, BlobStore};
use crate::summary::Summary;
use anyhow::Result;

/// Render the ledger as a table. The table is printed directly to stdout
/// (it is the command's product, not a log line); the returned `Out`
/// carries the snapshot as structured data.
pub fn list(store: &dyn BlobStore) -> Result<Out<Vec<Record>>> {
    let ledger = persist::load_ledger(store)?;
    let snapshot = ledger.snapshot();
    if snapshot.is_empty() {
        return Ok(Out::new("The ledger is empty", snapshot));
    }
    println!("{}", render_table(&snapshot));
    Ok(Out::new(format!("{} entries", snapshot.len()), snapshot))
}

pub fn summary(store: &dyn BlobStore) -> Result<Out<Summary>> {
    let ledger = persist::load_ledger(store)?;
    let totals = Summary::of(ledger.records());
    Ok(Out::new(
        format!(
            "{} entries: collected {}, sold {}, expenses {}, profit {}",
            ledger.len(),
            totals.collected,
            totals.sold,
            totals.expense,
            totals.profit
        ),
        totals,
    ))
}

/// Fixed-width rendering of the ten visible columns plus a position column.
fn render_table(records: &[Record]) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(records.len() + 1);
    let mut header: Vec<String> = vec!["#".to_string()];
    header.extend(EXPORT_HEADERS.iter().map(|h| h.to_string()));
    rows.push(header);
    for (ix, r) in records.iter().enumerate() {
        rows.push(vec![
            ix.to_string(),
            r.date.clone(),
            r.collected.to_string(),
            r.sold.to_string(),
            r.remaining.to_string(),
            r.price.to_string(),
            r.revenue.to_string(),
            r.expense_amount.to_string(),
            r.expense_description.clone(),
            r.profit.to_string(),
            r.running_balance.to_string(),
        ]);
    }

    let columns = rows[0].len();
    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    let mut table = String::new();
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(col, cell)| format!("{cell:>width$}", width = widths[col]))
            .collect();
        table.push_str(line.join("  ").trim_end());
        table.push('\n');
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::args::EntryArgs;
    use crate::model::Money;
    use crate::persist::FileStore;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, FileStore) {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path().join("data")).unwrap();
        let money = |s: &str| Money::from_str(s).unwrap();
        add(
            &store,
            &EntryArgs::new("2024-01-01", 10, 8, money("2.00"), money("1.00"), "feed"),
        )
        .unwrap();
        add(
            &store,
            &EntryArgs::new("2024-01-02", 5, 5, money("3.00"), money("0"), ""),
        )
        .unwrap();
        (temp, store)
    }

    #[test]
    fn test_summary_message_totals() {
        let (_temp, store) = seeded_store();
        let out = summary(&store).unwrap();
        let totals = out.structure().unwrap();
        assert_eq!(totals.collected, 15);
        assert_eq!(totals.sold, 13);
        assert_eq!(totals.profit, Money::from_str("30.00").unwrap());
        assert!(out.message().contains("profit 30.00"));
    }

    #[test]
    fn test_list_snapshot_is_ordered() {
        let (_temp, store) = seeded_store();
        let out = list(&store).unwrap();
        let snapshot = out.structure().unwrap();
        assert_eq!(snapshot[0].date, "2024-01-01");
        assert_eq!(snapshot[1].date, "2024-01-02");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let (_temp, store) = seeded_store();
        let snapshot = list(&store).unwrap().structure().unwrap().clone();
        let table = render_table(&snapshot);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Money on Hand"));
        assert!(lines[1].contains("2024-01-01"));
    }
}
