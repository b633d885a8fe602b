use clap::Parser;
use coop_ledger::args::{Args, Command};
use coop_ledger::commands;
use coop_ledger::persist::FileStore;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn main_inner(args: Args) -> anyhow::Result<()> {
    trace!("{args:?}");
    let store = FileStore::open(args.common().home().path())?;

    let _: () = match args.command() {
        Command::Add(entry_args) => commands::add(&store, entry_args)?.print(),
        Command::Edit(edit_args) => commands::edit(&store, edit_args)?.print(),
        Command::Rm(rm_args) => commands::remove(&store, rm_args)?.print(),
        Command::Clear => commands::clear(&store)?.print(),
        Command::List => commands::list(&store)?.print(),
        Command::Summary => commands::summary(&store)?.print(),
        Command::Import(import_args) => commands::import(&store, import_args)?.print(),
        Command::Export(export_args) => commands::export(&store, export_args)?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "coop_ledger={},{}={}",
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
