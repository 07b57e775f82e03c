//! # Store Settings
//!
//! File and environment configuration for the inventory store.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BOOKSTOCK_DB_PATH=/srv/bookstock/books.db                          │
//! │     BOOKSTOCK_MAX_CONNECTIONS=8                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bookstock/bookstock.toml (Linux)                         │
//! │     ~/Library/Application Support/com.example.bookstock/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     <platform data dir>/bookstock.db, 5 connections                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # bookstock.toml
//! [database]
//! path = "/srv/bookstock/books.db"
//! max_connections = 5
//! min_connections = 1
//! connect_timeout_secs = 30
//! idle_timeout_secs = 600
//! run_migrations = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

/// Environment variable overriding the database file.
pub const ENV_DB_PATH: &str = "BOOKSTOCK_DB_PATH";

/// Environment variable overriding the pool size.
pub const ENV_MAX_CONNECTIONS: &str = "BOOKSTOCK_MAX_CONNECTIONS";

const CONFIG_FILE_NAME: &str = "bookstock.toml";
const DATABASE_FILE_NAME: &str = "bookstock.db";

// =============================================================================
// Database Settings
// =============================================================================

/// The `[database]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Seconds an idle connection stays open.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            run_migrations: default_true(),
        }
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// Complete store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub database: DatabaseSettings,
}

impl StoreSettings {
    /// Loads settings: defaults, then the file, then the environment.
    ///
    /// A missing file is not an error. A file that cannot be read or parsed
    /// is.
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut settings = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store settings from file");
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    DbError::InvalidConfig(format!("{}: {}", path.display(), e))
                })?;
                settings = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Settings file not found, using defaults");
            }
        }

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;

        Ok(settings)
    }

    /// Parses settings from TOML text. Absent keys take their defaults.
    pub fn from_toml(contents: &str) -> DbResult<Self> {
        toml::from_str(contents).map_err(|e| DbError::InvalidConfig(e.to_string()))
    }

    /// Checks values the pool cannot work with.
    pub fn validate(&self) -> DbResult<()> {
        let db = &self.database;

        if db.path.as_os_str().is_empty() {
            return Err(DbError::InvalidConfig("database path is empty".into()));
        }

        if db.max_connections == 0 {
            return Err(DbError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        if db.min_connections > db.max_connections {
            return Err(DbError::InvalidConfig(format!(
                "min_connections ({}) exceeds max_connections ({})",
                db.min_connections, db.max_connections
            )));
        }

        Ok(())
    }

    /// Builds the pool configuration.
    pub fn to_db_config(&self) -> DbConfig {
        let db = &self.database;
        DbConfig::new(db.path.clone())
            .max_connections(db.max_connections)
            .min_connections(db.min_connections)
            .connect_timeout(Duration::from_secs(db.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(db.idle_timeout_secs))
            .run_migrations(db.run_migrations)
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// [`load`](Self::load)).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup(ENV_MAX_CONNECTIONS) {
            match max.parse::<u32>() {
                Ok(max) => {
                    debug!(max_connections = max, "Overriding pool size from environment");
                    self.database.max_connections = max;
                }
                Err(_) => warn!(value = %max, "Ignoring invalid {}", ENV_MAX_CONNECTIONS),
            }
        }
    }

    /// Returns the default settings file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "example", "bookstock")
}
