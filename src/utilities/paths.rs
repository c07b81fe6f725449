//! Storage locations for persisted companion state.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the storage directory.
pub const ENV_STORAGE_DIR: &str = "COMPANION_STORAGE_DIR";

const APP_NAME: &str = "companion";

/// File name of the value table document inside the storage directory.
pub const QTABLE_FILE_NAME: &str = "qtable.json";

/// Directory for persisted state.
///
/// `COMPANION_STORAGE_DIR` if set, otherwise the platform data directory:
/// - Linux: `~/.local/share/companion`
/// - macOS: `~/Library/Application Support/companion`
/// - Windows: `%LOCALAPPDATA%\companion`
///
/// The directory is not created here; writers create it on first save.
pub fn storage_dir() -> PathBuf {
    if let Some(dir) = env::var_os(ENV_STORAGE_DIR).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }

    if cfg!(target_os = "windows") {
        let base = env::var("LOCALAPPDATA")
            .or_else(|_| env::var("APPDATA"))
            .unwrap_or_else(|_| "C:\\tmp".to_string());
        PathBuf::from(base).join(APP_NAME)
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        let base = PathBuf::from(home);
        if cfg!(target_os = "macos") {
            base.join("Library").join("Application Support").join(APP_NAME)
        } else {
            base.join(".local").join("share").join(APP_NAME)
        }
    }
}

/// Default location of the value table document.
pub fn default_qtable_path() -> PathBuf {
    storage_dir().join(QTABLE_FILE_NAME)
}
