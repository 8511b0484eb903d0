//! Directory-backed save store: one pretty-printed JSON file per `(user, slot)`.
//!
//! Layout: `<root>/<hex(user)>/slot-<n>.json`. Writes go through a temp file and a
//! rename so a crash never leaves a half-written slot behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use grove::session::SLOT_COUNT;
use grove::{SaveRecord, SaveStore, StoreError};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, user: &str) -> PathBuf {
        let encoded: String = user.bytes().map(|byte| format!("{byte:02x}")).collect();
        self.root.join(encoded)
    }

    pub fn slot_path(&self, user: &str, slot: u8) -> PathBuf {
        self.user_dir(user).join(format!("slot-{slot}.json"))
    }
}

fn check_slot(slot: u8) -> Result<(), StoreError> {
    if (1..=SLOT_COUNT).contains(&slot) { Ok(()) } else { Err(StoreError::InvalidSlot(slot)) }
}

fn write_atomic(record: &SaveRecord, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(record)?;

    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}

impl SaveStore for JsonFileStore {
    fn fetch_slots(&self, user: &str) -> Result<Vec<SaveRecord>, StoreError> {
        let mut records = Vec::new();
        for slot in 1..=SLOT_COUNT {
            let path = self.slot_path(user, slot);
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            let record: SaveRecord = serde_json::from_str(&content)?;
            records.push(record);
        }
        Ok(records)
    }

    fn upsert(&mut self, record: &SaveRecord) -> Result<(), StoreError> {
        check_slot(record.slot.slot)?;
        write_atomic(record, &self.slot_path(&record.user, record.slot.slot))
    }

    fn delete(&mut self, user: &str, slot: u8) -> Result<(), StoreError> {
        check_slot(slot)?;
        match fs::remove_file(self.slot_path(user, slot)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
