//! CLI command implementations.

pub mod apps;
pub mod block;
pub mod config;
pub mod daemon;
pub mod data;
pub mod export;
pub mod history;
pub mod limit;
pub mod prune;
pub mod reset;
pub mod sample;
pub mod stats;
pub mod usage;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::actions::ActionExecutor;
use crate::config::Settings;
use crate::platform::Platform;
use crate::storage::Store;


/// Resolved settings and paths shared by every command.
pub struct Context {
    pub settings: Settings,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
}


impl Context {
    /// Load settings from `config_path`; an explicit `db_path` wins over the file.
    pub fn load(config_path: PathBuf, db_path: Option<PathBuf>) -> Result<Self> {
        let settings = Settings::load(&config_path)?;
        let db_path = db_path.unwrap_or_else(|| settings.db_path());

        Ok(Self {
            settings,
            config_path,
            db_path,
        })
    }

    pub fn open_store(&self) -> Result<Arc<Store>> {
        let store = Store::open(&self.db_path)
            .with_context(|| format!("Failed to open database: {}", self.db_path.display()))?;
        Ok(Arc::new(store))
    }

    pub fn platform(&self) -> Result<Platform> {
        Platform::from_settings(&self.settings).context("Failed to set up platform access")
    }

    /// Executor wired to the configured platform.
    pub fn executor(&self, store: &Arc<Store>) -> Result<ActionExecutor> {
        let platform = self.platform()?;
        Ok(ActionExecutor::new(
            Arc::clone(store),
            platform.policy,
            platform.launcher,
            platform.notifier,
        ))
    }
}
