//! Kcal Status Tool
//!
//! Provides runtime status information and usage instructions.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Tracker usage instructions for AI assistants
pub const TRACKER_INSTRUCTIONS: &str = r#"
# Kcal Tracker Instructions

This guide explains how to log food, activity and water with the Kcal Tracker tools.

## Dates and Times

- Dates use ISO format: YYYY-MM-DD. Times use HH:MM (24h).
- Omit `date` for today and `time` for now. Both are in the machine's local time zone.
- A day runs from 00:00:00.000 to 23:59:59.999 local time.

---

## Logging Food

### From a barcode

1. **Camera frames:** send the decoded frames to `confirm_scan`. A code is only accepted
   after it is read twice in a row. 13-digit reads with a wrong check digit are dropped.
   When a code is confirmed the product is looked up automatically.
2. **Typed barcode:** call `lookup_barcode` with `manual: true`. The code is only trimmed.
3. **Scanned barcode, single read:** call `lookup_barcode` with `manual: false`. EAN-13
   codes must carry a valid check digit.

If the camera is unavailable (permission denied, no camera), fall back to typing the code.

### From a name

Call `search_products`. The result is one of:
- `no_match` - nothing found, offer `log_manual_meal`
- `single` - one product, use it directly
- `choices` - ask the user which product they ate

### Logging the meal

Call `log_meal` with the product's per-100 values, the amount and a unit
(g, kg, oz, lb, ml, l, cup, tbsp, tsp). Energy is scaled to whole kcal, macros to one decimal.

Products without any energy field resolve to 0 kcal. Check the label before logging these.

### Manual meals

`log_manual_meal` takes a name, kcal and optional protein, fat and carbs (grams).

---

## Logging Activity

1. `list_activity_types` to find an activity id (filter by name or category).
2. `estimate_activity` to preview the burn: kcal = MET x weight_kg x hours.
3. `log_activity` with `activity_id` and `duration_minutes`.

Without a weight on the profile a 70 kg reference weight is used. Set one with `set_profile`.

For activities not in the catalog, pass `activity_name` and `calories` instead.
Entries with 0 minutes or 0 kcal are rejected.

---

## Water

`add_water` adds to the day's total. Typical glasses: 100, 200 or 300 ml.

---

## Daily Balance

`get_day_balance` returns consumed, burned and balance (consumed - burned) against the
calorie goal:

| Balance vs goal | Status |
|---|---|
| <= 90% | good |
| <= 110% | borderline |
| > 110% | over |

Water progress is reported separately and never affects the calorie balance.

## Notes

- Defaults until the profile is set: 1900 kcal, 2000 ml water.
- Deleting a meal or activity is permanent.
"#;

/// Runtime status of the Kcal service
#[derive(Debug, Clone, Serialize)]
pub struct KcalStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Product database in use
    pub product_api_url: String,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    product_api_url: String,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, product_api_url: String) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            product_api_url,
        }
    }

    pub fn get_status(&self) -> KcalStatus {
        let build_info = BuildInfo::current();

        // In-memory and not-yet-created databases have no size
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        KcalStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            product_api_url: self.product_api_url.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(
            PathBuf::from("/nonexistent/kcal.db"),
            "https://world.openfoodfacts.org".to_string(),
        );
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_instructions_name_every_logging_tool() {
        for tool in [
            "confirm_scan",
            "lookup_barcode",
            "search_products",
            "log_meal",
            "log_manual_meal",
            "log_activity",
            "add_water",
            "get_day_balance",
        ] {
            assert!(TRACKER_INSTRUCTIONS.contains(tool), "{} missing", tool);
        }
    }
}
