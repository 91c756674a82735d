use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

pub const USERS_FILE: &str = "users.txt";
pub const MENU_FILE: &str = "menu.txt";
pub const ORDERS_FILE: &str = "orders.txt";
pub const RECEIPTS_FILE: &str = "receipts.txt";
pub const ACTIVITY_FILE: &str = "login_activity.txt";
pub const SESSION_FILE: &str = "session_log.txt";

pub const MIN_RECEIPT_WIDTH: usize = 32;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding every data file; created on open.
    pub data_dir: PathBuf,
    /// Banner printed at the top of each receipt.
    pub cafe_name: String,
    pub low_stock_threshold: u32,
    pub receipt_width: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("files"),
            cafe_name: "CODEBREW CAFE".to_string(),
            low_stock_threshold: 5,
            receipt_width: 42,
        }
    }
}

impl StoreConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Reads a JSON config file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let config: StoreConfig = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cafe_name.trim().is_empty() {
            return Err(StoreError::Config("cafe_name must not be empty".to_string()));
        }
        if self.receipt_width < MIN_RECEIPT_WIDTH {
            return Err(StoreError::Config(format!(
                "receipt_width must be at least {}, got {}",
                MIN_RECEIPT_WIDTH, self.receipt_width
            )));
        }
        Ok(())
    }
}
