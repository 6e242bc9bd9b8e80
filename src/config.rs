//! Runtime configuration
//!
//! Settings come from environment variables with project-relative defaults.

use std::path::PathBuf;

/// Environment variable overriding the SQLite database location
pub const DATABASE_PATH_ENV: &str = "HEARTH_DATABASE_PATH";

/// Log directive applied on top of `RUST_LOG`
pub const DEFAULT_LOG_DIRECTIVE: &str = "hearth=info";

/// Get the database path from the environment or use `<project>/data/hearth.db`
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("hearth.db");
    path
}
