//! Handler for bulk import of a spreadsheet or delimited text file.

use crate::args::ImportArgs;
use crate::commands::Out;
use crate::grid::{Grid, SourceKind};
use crate::import::import_grid;
use crate::persist::{self, BlobStore};
use crate::reconcile::{reconcile, ReconcileReport};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Spreadsheet extensions handed to the workbook reader; everything else
/// is treated as delimited text.
const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsb", "ods"];

pub fn import(store: &dyn BlobStore, args: &ImportArgs) -> Result<Out<ReconcileReport>> {
    let path = args.file();
    let kind = args.kind().unwrap_or_else(|| infer_kind(path));
    debug!(file = %path.display(), %kind, "importing");

    let bytes = std::fs::read(path)
        .with_context(|| format!("Unable to read import file {}", path.display()))?;
    let grid = match kind {
        SourceKind::Spreadsheet => Grid::from_workbook_bytes(bytes),
        SourceKind::Delimited => Grid::from_delimited_bytes(bytes),
    }?;

    let mut ledger = persist::load_ledger(store)?;
    // A header or payload failure propagates here with the ledger untouched.
    let batch = import_grid(&grid, &ledger)?;
    let report = reconcile(&mut ledger, batch);

    if report.is_noop() {
        // Distinct from a structural failure: the file was understood, it
        // just contributed nothing new.
        return Ok(Out::new(
            format!("Nothing new to import ({} rows rejected)", report.rejected),
            report,
        ));
    }

    persist::save_ledger(store, &ledger)?;
    Ok(Out::new(
        format!(
            "Imported {} entries ({} rows rejected), the ledger now has {} entries",
            report.accepted,
            report.rejected,
            ledger.len()
        ),
        report,
    ))
}

fn infer_kind(path: &Path) -> SourceKind {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        SourceKind::Spreadsheet
    } else {
        SourceKind::Delimited
    }
}
