use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::HistoryError;
use crate::form_data::SwaggerFormData;

/// Default history file name inside the application config directory.
pub const HISTORY_FILE_NAME: &str = "history.json";

/// Loads and saves the last confirmed configuration.
pub trait HistoryStore {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SwaggerFormData>, HistoryError>;
    fn save(&self, data: &SwaggerFormData) -> Result<(), HistoryError>;
}

/// `<config dir>/scg/history.json`, or `None` if the platform has no config
/// directory.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scg").join(HISTORY_FILE_NAME))
}

/// History stored as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Option<SwaggerFormData>, HistoryError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(v) => v,
            Err(e) => {
                warn!("ignoring unreadable history {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };
        debug!("loaded history from {}", self.path.display());
        Ok(Some(SwaggerFormData::from_value_lenient(&value)))
    }

    fn save(&self, data: &SwaggerFormData) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)?;
        debug!("saved history to {}", self.path.display());
        Ok(())
    }
}

/// In-memory history, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RefCell<Option<SwaggerFormData>>,
}

impl MemoryStore {
    pub fn new(initial: Option<SwaggerFormData>) -> Self {
        Self {
            data: RefCell::new(initial),
        }
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Option<SwaggerFormData>, HistoryError> {
        Ok(self.data.borrow().clone())
    }

    fn save(&self, data: &SwaggerFormData) -> Result<(), HistoryError> {
        *self.data.borrow_mut() = Some(data.clone());
        Ok(())
    }
}
