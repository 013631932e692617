//! Schedule generator — drives the auto-fill engine across a multi-hour
//! range, persisting each hour as it resolves.

use crate::autofill::{AutoFill, HOUR_MS, LOOKBACK_MS};
use crate::catalog::Catalog;
use crate::clock::ClockTemplate;
use crate::rules::SeparationRule;
use crate::schedule::ScheduleEntry;
use crate::store::SchedulerStore;

/// Generate a schedule for `hours` hours starting at `start_time` (ms
/// epoch), using one clock for the whole range.
///
/// Each hour is persisted to the store before the next hour is filled, so a
/// failure mid-run leaves a valid partial schedule. Later hours see earlier
/// hours through the store's lookback window.
///
/// An empty catalog is not an error: every slot simply finds no candidates
/// and the result is empty. Callers that want to treat "nothing to
/// schedule" as a precondition failure check the catalog first.
pub fn generate_schedule(
    store: &mut SchedulerStore,
    engine: &mut AutoFill,
    clock: &ClockTemplate,
    catalog: &Catalog,
    rules: &[SeparationRule],
    start_time: i64,
    hours: u32,
    now_ms: i64,
) -> Result<Vec<ScheduleEntry>, String> {
    let mut all_entries = Vec::new();

    for i in 0..hours as i64 {
        let hour_start = start_time + i * HOUR_MS;

        // Lookback window is half-open at the hour start; the store query
        // is inclusive, so trim the boundary.
        let mut history = store.query_entries(hour_start - LOOKBACK_MS, hour_start);
        history.retain(|e| e.scheduled_time < hour_start);

        let hour_entries = engine.fill_hour(clock, hour_start, catalog, rules, &history, now_ms);

        for entry in &hour_entries {
            store.save_entry(entry.clone())?;
        }
        all_entries.extend(hour_entries);
    }

    Ok(all_entries)
}

/// As `generate_schedule`, but looks the clock up in the store by id.
pub fn generate_schedule_for_clock(
    store: &mut SchedulerStore,
    engine: &mut AutoFill,
    clock_id: &str,
    catalog: &Catalog,
    rules: &[SeparationRule],
    start_time: i64,
    hours: u32,
    now_ms: i64,
) -> Result<Vec<ScheduleEntry>, String> {
    let clock = store
        .get_clock(clock_id)
        .cloned()
        .ok_or_else(|| format!("Clock '{}' not found", clock_id))?;
    generate_schedule(
        store, engine, &clock, catalog, rules, start_time, hours, now_ms,
    )
}
