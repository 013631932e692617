use crate::ids::fresh_id;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// One resolved (slot → track) assignment.
///
/// `clock_id`, `element_id` and `track_id` are weak references: the
/// referenced clock or track may have been deleted since, and that is
/// tolerated (display layers just show "not found").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: String,
    pub track_id: String,
    /// Absolute instant, milliseconds since the Unix epoch. The authoritative
    /// ordering key for the schedule store.
    pub scheduled_time: i64,
    pub clock_id: String,
    pub element_id: String,
    #[serde(default)]
    pub played: bool,
}

impl ScheduleEntry {
    /// Create an entry with a fresh id and `played = false`.
    pub fn new(
        track_id: impl Into<String>,
        scheduled_time: i64,
        clock_id: impl Into<String>,
        element_id: impl Into<String>,
    ) -> Self {
        ScheduleEntry {
            id: fresh_id("sched"),
            track_id: track_id.into(),
            scheduled_time,
            clock_id: clock_id.into(),
            element_id: element_id.into(),
            played: false,
        }
    }

    /// Format the scheduled instant as "HH:MM" UTC for display.
    pub fn time_display(&self) -> String {
        match DateTime::from_timestamp_millis(self.scheduled_time) {
            Some(dt) => dt.format("%H:%M").to_string(),
            None => "--:--".to_string(),
        }
    }
}
