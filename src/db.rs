use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::codec::{decode_lines, encode_lines, Record};
use crate::config::{
    StoreConfig, ACTIVITY_FILE, MENU_FILE, ORDERS_FILE, RECEIPTS_FILE, SESSION_FILE, USERS_FILE,
};
use crate::error::{Result, StoreError};
use crate::models::{MenuItem, Order, Role, User};

pub const RECEIPT_START: &str = "=== NEW RECEIPT ===";
pub const RECEIPT_END: &str = "===================";

/// Local timestamp with milliseconds, as written to the activity and session logs.
pub(crate) fn log_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

/// File-backed repositories for every persisted collection.
///
/// Each call opens, uses and closes its file; no handle outlives the call.
/// Collections are rewritten whole, logs are only ever appended to.
pub struct Database {
    data_dir: PathBuf,
    pub config: StoreConfig,
}

impl Database {
    pub fn open(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)
            .map_err(|e| StoreError::io(&config.data_dir, e))?;

        Ok(Database {
            data_dir: config.data_dir.clone(),
            config: config.clone(),
        })
    }

    /// Seeds the default accounts on first boot. An existing users file is
    /// never overwritten, only an absent or empty one.
    pub fn initialize(&self) -> Result<()> {
        let path = self.path(USERS_FILE);
        let needs_seed = match fs::read(&path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                if content.trim().is_empty() {
                    true
                } else {
                    if decode_lines::<User>(&content).is_empty() {
                        tracing::warn!(path = %path.display(), "Users file holds no readable user, leaving it as is");
                    }
                    false
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Users file unreadable, not seeding");
                false
            }
        };

        if needs_seed {
            tracing::info!(path = %path.display(), "Seeding default admin and staff accounts");
            self.save_users(&[
                User::new(Role::Admin, "admin", "iamadmin"),
                User::new(Role::Staff, "staff", "iamstaff"),
            ])?;
        }

        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    // ===== collections =====

    pub fn load_users(&self) -> Vec<User> {
        self.load_all(USERS_FILE, || vec![User::new(Role::Admin, "admin", "admin")])
    }

    pub fn save_users(&self, users: &[User]) -> Result<()> {
        self.save_all(USERS_FILE, users)
    }

    pub fn load_menu(&self) -> Vec<MenuItem> {
        self.load_all(MENU_FILE, || {
            vec![
                MenuItem::new("F1", "Coffee", Decimal::new(250, 2), "Beverage", 20),
                MenuItem::new("F2", "Sandwich", Decimal::new(500, 2), "Food", 15),
            ]
        })
    }

    pub fn save_menu(&self, items: &[MenuItem]) -> Result<()> {
        self.save_all(MENU_FILE, items)
    }

    pub fn load_orders(&self) -> Vec<Order> {
        self.load_all(ORDERS_FILE, Vec::new)
    }

    pub fn save_orders(&self, orders: &[Order]) -> Result<()> {
        self.save_all(ORDERS_FILE, orders)
    }

    fn load_all<T: Record>(&self, file_name: &str, default: impl FnOnce() -> Vec<T>) -> Vec<T> {
        let path = self.path(file_name);
        match fs::read(&path) {
            Ok(bytes) => {
                // Undecodable bytes only spoil their own line.
                let records = decode_lines::<T>(&String::from_utf8_lossy(&bytes));
                tracing::debug!(kind = T::KIND, count = records.len(), "Loaded records");
                records
            }
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), "Data file absent, using defaults");
                } else {
                    tracing::warn!(path = %path.display(), error = %e, "Data file unreadable, using defaults");
                }
                default()
            }
        }
    }

    fn save_all<T: Record>(&self, file_name: &str, records: &[T]) -> Result<()> {
        let path = self.path(file_name);
        let result = File::create(&path)
            .and_then(|mut file| file.write_all(encode_lines(records).as_bytes()));

        match result {
            Ok(()) => {
                tracing::debug!(kind = T::KIND, count = records.len(), "Saved records");
                Ok(())
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to save {}s", T::KIND);
                Err(StoreError::io(path, e))
            }
        }
    }

    // ===== append-only logs =====

    pub fn append_receipt(&self, receipt: &str) -> Result<()> {
        let block = format!(
            "{}\n{}\n{}\n\n",
            RECEIPT_START,
            receipt.trim_end_matches('\n'),
            RECEIPT_END
        );
        self.append(RECEIPTS_FILE, &block)
    }

    /// Receipt bodies in the order they were written.
    pub fn load_receipts(&self) -> Vec<String> {
        let Some(content) = self.read_log(RECEIPTS_FILE) else {
            return Vec::new();
        };

        let mut receipts = Vec::new();
        let mut body: Vec<&str> = Vec::new();
        let mut inside = false;
        for line in content.lines() {
            if !inside {
                if line == RECEIPT_START {
                    inside = true;
                    body.clear();
                }
                continue;
            }
            if line == RECEIPT_END {
                receipts.push(body.join("\n"));
                inside = false;
            } else {
                body.push(line);
            }
        }
        if inside {
            tracing::warn!("Receipt log ends inside an unterminated receipt");
        }
        receipts
    }

    pub fn log_activity(&self, message: &str) -> Result<()> {
        self.log_activity_at(message, Local::now())
    }

    pub fn log_activity_at(&self, message: &str, at: DateTime<Local>) -> Result<()> {
        self.append(ACTIVITY_FILE, &format!("{} - {}\n", log_timestamp(at), message))
    }

    pub fn load_activity_log(&self) -> Vec<String> {
        self.read_lines(ACTIVITY_FILE)
    }

    pub fn append_session(&self, line: &str) -> Result<()> {
        self.append(SESSION_FILE, &format!("{}\n", line))
    }

    pub fn load_session_log(&self) -> Vec<String> {
        self.read_lines(SESSION_FILE)
    }

    fn append(&self, file_name: &str, text: &str) -> Result<()> {
        let path = self.path(file_name);
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| file.write_all(text.as_bytes()));

        result.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to append to log");
            StoreError::io(path, e)
        })
    }

    fn read_log(&self, file_name: &str) -> Option<String> {
        let path = self.path(file_name);
        match fs::read(&path) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Log file unreadable");
                None
            }
        }
    }

    fn read_lines(&self, file_name: &str) -> Vec<String> {
        self.read_log(file_name)
            .map(|content| {
                content
                    .lines()
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
