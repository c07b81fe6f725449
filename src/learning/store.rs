//! Durable storage for the value table.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::ValueTable;
use crate::error::StoreError;
use crate::utilities::file_handler::JsonFileHandler;

/// Where the learner reads its table at construction and writes it after
/// every update.
pub trait ValueTableStore: Send + std::fmt::Debug {
    /// Load the stored table.  A store with nothing saved yet returns an
    /// empty table.
    fn load(&self) -> Result<ValueTable, StoreError>;

    /// Replace the stored table.
    fn save(&self, table: &ValueTable) -> Result<(), StoreError>;
}

/// JSON document on the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    handler: JsonFileHandler,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            handler: JsonFileHandler::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.handler.path()
    }
}

impl ValueTableStore for JsonFileStore {
    fn load(&self) -> Result<ValueTable, StoreError> {
        Ok(self.handler.load()?.unwrap_or_default())
    }

    fn save(&self, table: &ValueTable) -> Result<(), StoreError> {
        self.handler.save(table)
    }
}

/// In-process store.  Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    table: Option<ValueTable>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a table.
    pub fn with_table(table: ValueTable) -> Self {
        let store = Self::new();
        store.inner.lock().table = Some(table);
        store
    }

    /// Last saved (or seeded) table.
    pub fn snapshot(&self) -> Option<ValueTable> {
        self.inner.lock().table.clone()
    }

    /// Number of saves so far.
    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }
}

impl ValueTableStore for MemoryStore {
    fn load(&self) -> Result<ValueTable, StoreError> {
        Ok(self.inner.lock().table.clone().unwrap_or_default())
    }

    fn save(&self, table: &ValueTable) -> Result<(), StoreError> {
        let mut slot = self.inner.lock();
        slot.table = Some(table.clone());
        slot.saves += 1;
        Ok(())
    }
}
