pub mod args;
pub mod commands;
mod error;
pub mod export;
pub mod grid;
pub mod import;
pub mod ledger;
pub mod model;
pub mod persist;
pub mod reconcile;
pub mod summary;


pub use error::Error;
pub use error::Result;
pub use ledger::Ledger;
pub use model::{Money, Record};
