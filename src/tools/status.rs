//! Hearth Status Tool
//!
//! Runtime status and usage instructions for the Hearth service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};

/// Recipe instructions for AI assistants
pub const RECIPE_INSTRUCTIONS: &str = r#"
# Hearth Recipe Instructions

## Storing recipes

- `create_recipe` takes a name, the number of servings the recipe yields
  (at least 1) and optionally the ingredient list.
- Each ingredient has a `name`, an optional `amount` and an optional `unit`.
- `amount` may be a number (`200`, `1.5`) or free text (`"1/2"`, `"a pinch"`).
  Free text is kept as written and is never scaled.
- Use the short unit tags: g, kg, ml, l, oz, lb, fl oz, cup, tbsp, tsp,
  piece, bunch, handful, package, can, glass, dash, pinch. Other unit text is
  kept and shown as written but never converted.

## Viewing a recipe for a different number of people

Call `view_recipe` with `current_servings`. Every amount is scaled by
`current_servings / servings` and rounded for display: whole numbers stay
whole, everything else gets one decimal (100 g for 3 → 4 servings shows
133.3 g).

## Metric and imperial

`show_alternative` controls the measurement system:

| show_alternative | metric units (g, kg, ml, l) | imperial units (oz, lb, fl oz, cup, tbsp, tsp) |
|------------------|-----------------------------|-----------------------------------------------|
| false (default)  | shown as stored             | converted to metric                           |
| true             | converted to imperial       | shown as stored                               |

Converted amounts are prefixed with "≈". Count-style units (piece, pinch,
can, ...) are never converted.

## Single values

- `scale_amount` scales one amount.
- `convert_amount` converts between two units; leave `to_unit` empty to use
  the unit's usual counterpart (g → oz, l → cup, cup → ml, ...).
- `render_amount` produces the same display string `view_recipe` uses.
- `list_units` shows every unit, its system and its counterpart.
"#;

/// Runtime status of the Hearth service
#[derive(Debug, Clone, Serialize)]
pub struct HearthStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> HearthStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let schema_version = db.with_conn(migrations::get_schema_version).ok();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        HearthStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
