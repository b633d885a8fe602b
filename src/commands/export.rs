//! Handler for exporting the ledger to a file.

use crate::args::{ExportArgs, ExportFormat};
use crate::commands::Out;
use crate::export::{to_csv, to_doc, to_xlsx};
use crate::persist::{self, BlobStore};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn export(store: &dyn BlobStore, args: &ExportArgs) -> Result<Out<PathBuf>> {
    let ledger = persist::load_ledger(store)?;
    let snapshot = ledger.snapshot();

    let bytes = match args.format() {
        ExportFormat::Csv => to_csv(&snapshot)?,
        ExportFormat::Xlsx => to_xlsx(&snapshot)?,
        ExportFormat::Doc => to_doc(&snapshot),
    };

    let path = args
        .output()
        .cloned()
        .unwrap_or_else(|| PathBuf::from(default_file_name(args.format())));
    std::fs::write(&path, bytes)
        .with_context(|| format!("Unable to write export file {}", path.display()))?;

    Ok(Out::new(
        format!(
            "Exported {} entries to {}",
            snapshot.len(),
            path.display()
        ),
        path,
    ))
}

fn default_file_name(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Csv => "coop_ledger.csv",
        ExportFormat::Xlsx => "coop_ledger.xlsx",
        ExportFormat::Doc => "coop_report.doc",
    }
}
