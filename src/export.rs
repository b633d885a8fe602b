//! Export projections of a record snapshot: delimited text, a spreadsheet
//! workbook, and a page-formatted report document.
//!
//! Each output is a straight projection of the ten visible fields with
//! fixed two-decimal formatting for the monetary columns. No ledger logic
//! lives here; everything works from a read-only snapshot.

use crate::model::Record;
use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

/// The visible column headers, in projection order.
pub const EXPORT_HEADERS: [&str; 10] = [
    "Date",
    "Collected",
    "Sold",
    "Remaining",
    "Price",
    "Revenue",
    "Expense Amt",
    "Expense Desc",
    "Profit",
    "Money on Hand",
];

/// One record as its ten visible cells.
fn project(record: &Record) -> [String; 10] {
    [
        record.date.clone(),
        record.collected.to_string(),
        record.sold.to_string(),
        record.remaining.to_string(),
        record.price.to_string(),
        record.revenue.to_string(),
        record.expense_amount.to_string(),
        record.expense_description.clone(),
        record.profit.to_string(),
        record.running_balance.to_string(),
    ]
}

/// Render the snapshot as delimited text bytes.
pub fn to_csv(records: &[Record]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADERS)
        .context("Failed to write the csv header row")?;
    for record in records {
        writer
            .write_record(project(record))
            .context("Failed to write a csv data row")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish writing csv output: {e}"))
}

/// Render the snapshot as a single-sheet workbook.
pub fn to_xlsx(records: &[Record]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .context("Failed to write a worksheet header cell")?;
    }
    for (ix, record) in records.iter().enumerate() {
        let row = (ix + 1) as u32;
        for (col, value) in project(record).iter().enumerate() {
            worksheet
                .write_string(row, col as u16, value.as_str())
                .context("Failed to write a worksheet data cell")?;
        }
    }

    workbook
        .save_to_buffer()
        .context("Failed to render the workbook")
}

/// Render the snapshot as a word-processor-compatible HTML report, byte
/// order mark included so the consumer treats it as UTF-8.
pub fn to_doc(records: &[Record]) -> Vec<u8> {
    let mut html = String::from(
        "\u{feff}<html>\n<head><meta charset=\"utf-8\"><title>Daily Ledger Report</title></head>\n\
         <body>\n<h2>Daily Ledger Report</h2>\n\
         <table border=\"1\" style=\"border-collapse: collapse; width: 100%;\">\n<thead>\n<tr>",
    );
    for header in EXPORT_HEADERS {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for record in records {
        html.push_str("<tr>");
        for value in project(record) {
            html.push_str(&format!("<td>{}</td>", escape_html(&value)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html.into_bytes()
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
