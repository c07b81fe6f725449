//! JSON document reader/writer with atomic replacement.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Reads and rewrites a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileHandler {
    path: PathBuf,
}

impl JsonFileHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Decode the document.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Replace the document with `data`.
    ///
    /// Writes to a sibling temp file and renames it over the target, so a
    /// reader never sees a half-written document.  Creates the parent
    /// directory if needed.
    pub fn save<T: Serialize + ?Sized>(&self, data: &T) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(data)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
