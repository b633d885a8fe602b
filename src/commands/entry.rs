//! Handlers for single-entry mutations: add, edit, rm, clear.

use crate::args::{EditArgs, EntryArgs, RmArgs};
use crate::commands::Out;
use crate::model::Record;
use crate::persist::{self, BlobStore};
use anyhow::Result;

fn build_record(args: &EntryArgs) -> Record {
    Record::new(
        args.date(),
        args.collected(),
        args.sold(),
        args.price(),
        args.expense_amount(),
        args.expense_description(),
    )
}

pub fn add(store: &dyn BlobStore, args: &EntryArgs) -> Result<Out<Record>> {
    let mut ledger = persist::load_ledger(store)?;
    let record = build_record(args);
    ledger.add(record.clone())?;
    persist::save_ledger(store, &ledger)?;
    Ok(Out::new(
        format!(
            "Added entry for '{}', the ledger now has {} entries",
            record.date,
            ledger.len()
        ),
        record,
    ))
}

pub fn edit(store: &dyn BlobStore, args: &EditArgs) -> Result<Out<Record>> {
    let mut ledger = persist::load_ledger(store)?;
    let record = build_record(args.entry());
    ledger.update(args.index(), record.clone())?;
    persist::save_ledger(store, &ledger)?;
    Ok(Out::new(
        format!("Replaced entry at position {}", args.index()),
        record,
    ))
}

pub fn remove(store: &dyn BlobStore, args: &RmArgs) -> Result<Out<Record>> {
    let mut ledger = persist::load_ledger(store)?;
    let removed = ledger.remove(args.index())?;
    persist::save_ledger(store, &ledger)?;
    Ok(Out::new(
        format!(
            "Deleted the entry for '{}', {} entries remain",
            removed.date,
            ledger.len()
        ),
        removed,
    ))
}

/// Empties the ledger and deletes the saved data file. Irreversible.
pub fn clear(store: &dyn BlobStore) -> Result<Out<()>> {
    let mut ledger = persist::load_ledger(store)?;
    let count = ledger.len();
    ledger.clear();
    persist::delete_ledger(store)?;
    Ok(Out::new_message(format!("Cleared {count} entries")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Money;
    use crate::persist::FileStore;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path().join("data")).unwrap();
        (temp, store)
    }

    fn entry(date: &str) -> EntryArgs {
        EntryArgs::new(
            date,
            10,
            8,
            Money::from_str("2.00").unwrap(),
            Money::from_str("1.00").unwrap(),
            "feed",
        )
    }

    #[test]
    fn test_add_persists() {
        let (_temp, store) = store();
        let out = add(&store, &entry("2024-01-01")).unwrap();
        assert!(out.message().contains("2024-01-01"));
        let ledger = persist::load_ledger(&store).unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_add_duplicate_date_fails() {
        let (_temp, store) = store();
        add(&store, &entry("2024-01-01")).unwrap();
        assert!(add(&store, &entry("2024-01-01")).is_err());
        assert_eq!(persist::load_ledger(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_edit_and_remove() {
        let (_temp, store) = store();
        add(&store, &entry("2024-01-01")).unwrap();
        add(&store, &entry("2024-01-02")).unwrap();

        edit(&store, &EditArgs::new(0, entry("2024-01-03"))).unwrap();
        let ledger = persist::load_ledger(&store).unwrap();
        assert_eq!(ledger.records()[0].date, "2024-01-03");

        remove(&store, &RmArgs::new(1)).unwrap();
        assert_eq!(persist::load_ledger(&store).unwrap().len(), 1);
        assert!(remove(&store, &RmArgs::new(7)).is_err());
    }

    #[test]
    fn test_clear_removes_blob() {
        let (_temp, store) = store();
        add(&store, &entry("2024-01-01")).unwrap();
        clear(&store).unwrap();
        assert!(store.get(persist::LEDGER_KEY).unwrap().is_none());
        assert!(persist::load_ledger(&store).unwrap().is_empty());
    }
}
