pub mod activity;
pub mod codec;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod receipt;
pub mod stock;


pub use activity::SessionStore;
pub use config::StoreConfig;
pub use db::Database;
pub use error::{Result, StoreError};

use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber for the host process, filtered by `RUST_LOG`
/// (default `info`). Later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Opens the data directory described by `config` and seeds first-boot
/// accounts.
pub fn open_store(config: &StoreConfig) -> Result<Database> {
    let db = Database::open(config)?;
    db.initialize()?;
    tracing::info!(data_dir = %db.data_dir().display(), "Store ready");
    Ok(db)
}
