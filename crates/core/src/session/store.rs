//! Persistence boundary: effects emitted by the controller, the store trait they are
//! applied to, and a retrying queue between the two.

use std::collections::{BTreeMap, VecDeque};
use std::io;

use thiserror::Error;
use tracing::{debug, warn};

use super::slots::{SLOT_COUNT, SaveRecord, SaveSlot};

/// A write the controller wants persisted. Applied in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersistenceEffect {
    Upsert(SaveRecord),
    Delete { user: String, slot: u8 },
}

impl PersistenceEffect {
    pub fn key(&self) -> (&str, u8) {
        match self {
            PersistenceEffect::Upsert(record) => (record.user.as_str(), record.slot.slot),
            PersistenceEffect::Delete { user, slot } => (user.as_str(), *slot),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("save store unavailable: {0}")]
    Unavailable(String),
    #[error("slot {0} does not exist")]
    InvalidSlot(u8),
    #[error("save store I/O failed")]
    Io(#[from] io::Error),
    #[error("save record could not be encoded or decoded")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value save storage keyed by `(user, slot)`. Writes are idempotent.
pub trait SaveStore {
    fn fetch_slots(&self, user: &str) -> Result<Vec<SaveRecord>, StoreError>;
    fn upsert(&mut self, record: &SaveRecord) -> Result<(), StoreError>;
    fn delete(&mut self, user: &str, slot: u8) -> Result<(), StoreError>;
}

/// In-process store. `set_available(false)` makes every call fail, for exercising retries.
#[derive(Debug)]
pub struct MemoryStore {
    records: BTreeMap<(String, u8), SaveSlot>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self { records: BTreeMap::new(), available: true }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, user: &str, slot: u8) -> Option<&SaveSlot> {
        self.records.get(&(user.to_string(), slot))
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        }
    }
}

impl SaveStore for MemoryStore {
    fn fetch_slots(&self, user: &str) -> Result<Vec<SaveRecord>, StoreError> {
        self.check()?;
        Ok(self
            .records
            .iter()
            .filter(|((owner, _), _)| owner == user)
            .map(|((owner, _), slot)| SaveRecord { user: owner.clone(), slot: slot.clone() })
            .collect())
    }

    fn upsert(&mut self, record: &SaveRecord) -> Result<(), StoreError> {
        self.check()?;
        if !(1..=SLOT_COUNT).contains(&record.slot.slot) {
            return Err(StoreError::InvalidSlot(record.slot.slot));
        }
        self.records.insert((record.user.clone(), record.slot.slot), record.slot.clone());
        Ok(())
    }

    fn delete(&mut self, user: &str, slot: u8) -> Result<(), StoreError> {
        self.check()?;
        self.records.remove(&(user.to_string(), slot));
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub applied: usize,
    pub pending: usize,
    pub failed: bool,
}

/// Holds effects until a store accepts them. A failed write stops the flush so later
/// effects for the same key never overtake it; the failure stays queued for the next flush.
#[derive(Debug, Default)]
pub struct SyncQueue {
    pending: VecDeque<PersistenceEffect>,
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_all(&mut self, effects: impl IntoIterator<Item = PersistenceEffect>) {
        self.pending.extend(effects);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn flush(&mut self, store: &mut dyn SaveStore) -> SyncReport {
        let mut report = SyncReport::default();
        while let Some(effect) = self.pending.front() {
            let result = match effect {
                PersistenceEffect::Upsert(record) => store.upsert(record),
                PersistenceEffect::Delete { user, slot } => store.delete(user, *slot),
            };
            match result {
                Ok(()) => {
                    report.applied += 1;
                    self.pending.pop_front();
                }
                Err(error) => {
                    let (user, slot) = effect.key();
                    warn!(user, slot, %error, queued = self.pending.len(), "save sync failed; will retry");
                    report.failed = true;
                    break;
                }
            }
        }
        report.pending = self.pending.len();
        debug!(applied = report.applied, pending = report.pending, "save sync flushed");
        report
    }
}
