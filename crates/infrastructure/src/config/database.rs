//! Database (SQLite) configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file (`:memory:` for a private in-memory db)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum number of concurrent database connections
    ///
    /// Must be 1 for `:memory:`, every pooled connection would otherwise
    /// open its own empty database.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Whether to run pending migrations on startup (default: true)
    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// Insert the sample loads when the loads table is empty (default: true)
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,
}

fn default_db_path() -> String {
    "loadbroker.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            run_migrations: true,
            seed_sample_data: true,
        }
    }
}

impl DatabaseConfig {
    /// Single-connection in-memory database, migrated and empty
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
            seed_sample_data: false,
        }
    }
}
