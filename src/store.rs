//! SchedulerStore — durable home of the four scheduler collections.
//!
//! One JSON file per collection under a caller-supplied directory. The store
//! is an explicitly constructed object with an open/close lifecycle; nothing
//! here is a hidden singleton. Every mutation writes through to disk, so a
//! caller that crashes mid-run still finds everything persisted up to the
//! last completed operation.

use crate::clock::{ClockTemplate, SlotKind};
use crate::rules::{RuleKind, SeparationRule};
use crate::schedule::ScheduleEntry;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CLOCKS_FILE: &str = "clocks.json";
const RULES_FILE: &str = "rules.json";
const SCHEDULE_FILE: &str = "schedule.json";
const CONFIG_FILE: &str = "config.json";

/// Station-level scheduler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Clock id to use when the operator has not picked one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_clock: Option<String>,
}

pub struct SchedulerStore {
    dir: PathBuf,
    clocks: Vec<ClockTemplate>,
    rules: Vec<SeparationRule>,
    entries: Vec<ScheduleEntry>,
    config: Option<SchedulerConfig>,
}

/// Load a JSON collection file, or fall back to the default on absence or
/// corruption (with a warning, so operators notice a wiped file).
fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(value) => return value,
                Err(e) => eprintln!(
                    "Warning: corrupt store file '{}', starting fresh: {}",
                    path.display(),
                    e
                ),
            },
            Err(e) => eprintln!("Warning: could not read '{}': {}", path.display(), e),
        }
    }
    T::default()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Serialize error for '{}': {}", path.display(), e))?;
    fs::write(path, json).map_err(|e| format!("Write error for '{}': {}", path.display(), e))
}

impl SchedulerStore {
    /// Open (or create) a store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self, String> {
        fs::create_dir_all(dir)
            .map_err(|e| format!("Could not create store dir '{}': {}", dir.display(), e))?;
        Ok(SchedulerStore {
            dir: dir.to_path_buf(),
            clocks: load_or_default(&dir.join(CLOCKS_FILE)),
            rules: load_or_default(&dir.join(RULES_FILE)),
            entries: load_or_default(&dir.join(SCHEDULE_FILE)),
            config: None,
        })
    }

    /// The conventional per-user store location.
    pub fn default_dir() -> Result<PathBuf, String> {
        dirs::data_dir()
            .map(|d| d.join("clockwheel"))
            .ok_or_else(|| "No data directory available on this platform".to_string())
    }

    /// Close the store. All mutations are written through as they happen,
    /// so this only ends the lifecycle.
    pub fn close(self) {}

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ── Clock templates ─────────────────────────────────────────────────

    /// Upsert a clock template by id. Last write wins.
    pub fn save_clock(&mut self, clock: ClockTemplate) -> Result<(), String> {
        match self.clocks.iter_mut().find(|c| c.id == clock.id) {
            Some(existing) => *existing = clock,
            None => self.clocks.push(clock),
        }
        write_json(&self.dir.join(CLOCKS_FILE), &self.clocks)
    }

    pub fn get_clock(&self, id: &str) -> Option<&ClockTemplate> {
        self.clocks.iter().find(|c| c.id == id)
    }

    pub fn clocks(&self) -> &[ClockTemplate] {
        &self.clocks
    }

    /// Delete a clock template. Schedule entries referencing it are left
    /// alone; their clock id simply dangles.
    pub fn delete_clock(&mut self, id: &str) -> Result<(), String> {
        self.clocks.retain(|c| c.id != id);
        write_json(&self.dir.join(CLOCKS_FILE), &self.clocks)
    }

    // ── Separation rules ────────────────────────────────────────────────

    /// Upsert a separation rule by id.
    pub fn save_rule(&mut self, rule: SeparationRule) -> Result<(), String> {
        match self.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        write_json(&self.dir.join(RULES_FILE), &self.rules)
    }

    pub fn rules(&self) -> &[SeparationRule] {
        &self.rules
    }

    pub fn delete_rule(&mut self, id: &str) -> Result<(), String> {
        self.rules.retain(|r| r.id != id);
        write_json(&self.dir.join(RULES_FILE), &self.rules)
    }

    // ── Schedule entries ────────────────────────────────────────────────

    /// Upsert a schedule entry by id.
    pub fn save_entry(&mut self, entry: ScheduleEntry) -> Result<(), String> {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        write_json(&self.dir.join(SCHEDULE_FILE), &self.entries)
    }

    /// Entries with `scheduled_time` in `[start_ms, end_ms]`, both bounds
    /// inclusive. A pure filter in stored order.
    pub fn query_entries(&self, start_ms: i64, end_ms: i64) -> Vec<ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.scheduled_time >= start_ms && e.scheduled_time <= end_ms)
            .cloned()
            .collect()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Delete every schedule entry. The system regenerates whole schedules;
    /// there is no range-scoped clear.
    pub fn clear_schedule(&mut self) -> Result<(), String> {
        self.entries.clear();
        write_json(&self.dir.join(SCHEDULE_FILE), &self.entries)
    }

    // ── Config ──────────────────────────────────────────────────────────

    /// The scheduler config, materialising (and persisting) a default
    /// record on first read.
    pub fn config(&mut self) -> Result<SchedulerConfig, String> {
        if let Some(cfg) = &self.config {
            return Ok(cfg.clone());
        }
        let path = self.dir.join(CONFIG_FILE);
        let cfg: SchedulerConfig = load_or_default(&path);
        if !path.exists() {
            write_json(&path, &cfg)?;
        }
        self.config = Some(cfg.clone());
        Ok(cfg)
    }

    pub fn save_config(&mut self, config: SchedulerConfig) -> Result<(), String> {
        write_json(&self.dir.join(CONFIG_FILE), &config)?;
        self.config = Some(config);
        Ok(())
    }

    // ── Default data ────────────────────────────────────────────────────

    /// Seed the default clock and separation rules on first use.
    ///
    /// Idempotent: the clock is only seeded when no clocks exist, the rules
    /// only when no rules exist.
    pub fn seed_defaults(&mut self) -> Result<(), String> {
        if self.clocks.is_empty() {
            let mut clock = ClockTemplate::new(
                "Default Hour",
                Some("Standard hourly rotation".to_string()),
            );
            for (kind, position) in DEFAULT_CLOCK_PATTERN {
                clock = clock.add_element(*kind, *position);
            }
            self.save_clock(clock)?;
        }
        if self.rules.is_empty() {
            self.save_rule(SeparationRule::new("Artist Separation", RuleKind::Artist, 60))?;
            self.save_rule(SeparationRule::new("Track Separation", RuleKind::Track, 180))?;
            self.save_rule(SeparationRule::new("Jingle Separation", RuleKind::Category, 15))?;
        }
        Ok(())
    }
}

/// The stock rotation: music blocks broken up by sweepers, jingles and
/// station IDs at fixed minutes.
const DEFAULT_CLOCK_PATTERN: &[(SlotKind, u32)] = &[
    (SlotKind::Music, 0),
    (SlotKind::Music, 4),
    (SlotKind::Sweeper, 8),
    (SlotKind::Music, 9),
    (SlotKind::Music, 13),
    (SlotKind::Jingle, 17),
    (SlotKind::Music, 18),
    (SlotKind::Music, 22),
    (SlotKind::Id, 26),
    (SlotKind::Music, 27),
    (SlotKind::Music, 31),
    (SlotKind::Sweeper, 35),
    (SlotKind::Music, 36),
    (SlotKind::Music, 40),
    (SlotKind::Jingle, 44),
    (SlotKind::Music, 45),
    (SlotKind::Music, 49),
    (SlotKind::Id, 53),
    (SlotKind::Music, 54),
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store(dir: &Path) -> SchedulerStore {
        SchedulerStore::open(dir).unwrap()
    }

    #[test]
    fn open_creates_directory() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("nested").join("store");
        let store = open_store(&dir);
        assert!(dir.exists());
        assert_eq!(store.clocks().len(), 0);
    }

    #[test]
    fn clock_save_is_upsert() {
        let tmp = tempdir().unwrap();
        let mut store = open_store(tmp.path());

        let clock = ClockTemplate::new("Morning", None);
        let id = clock.id.clone();
        store.save_clock(clock.clone()).unwrap();
        assert_eq!(store.clocks().len(), 1);

        let renamed = ClockTemplate {
            name: "Morning Drive".to_string(),
            ..clock
        };
        store.save_clock(renamed).unwrap();
        assert_eq!(store.clocks().len(), 1);
        assert_eq!(store.get_clock(&id).unwrap().name, "Morning Drive");
    }

    #[test]
    fn clock_delete() {
        let tmp = tempdir().unwrap();
        let mut store = open_store(tmp.path());
        let clock = ClockTemplate::new("Doomed", None);
        let id = clock.id.clone();
        store.save_clock(clock).unwrap();
        store.delete_clock(&id).unwrap();
        assert!(store.get_clock(&id).is_none());
        // deleting again is harmless
        store.delete_clock(&id).unwrap();
    }

    #[test]
    fn rules_save_and_delete() {
        let tmp = tempdir().unwrap();
        let mut store = open_store(tmp.path());
        let rule = SeparationRule::new("Artist", RuleKind::Artist, 60);
        let id = rule.id.clone();
        store.save_rule(rule.clone()).unwrap();
        assert_eq!(store.rules().len(), 1);

        let mut toggled = rule;
        toggled.enabled = false;
        store.save_rule(toggled).unwrap();
        assert_eq!(store.rules().len(), 1);
        assert!(!store.rules()[0].enabled);

        store.delete_rule(&id).unwrap();
        assert!(store.rules().is_empty());
    }

    #[test]
    fn query_entries_is_inclusive_of_both_bounds() {
        let tmp = tempdir().unwrap();
        let mut store = open_store(tmp.path());
        for t in [100, 200, 300, 400] {
            store
                .save_entry(ScheduleEntry::new("t1", t, "c", "e"))
                .unwrap();
        }
        let hits = store.query_entries(200, 300);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].scheduled_time, 200);
        assert_eq!(hits[1].scheduled_time, 300);
    }

    #[test]
    fn clear_schedule_wipes_everything() {
        let tmp = tempdir().unwrap();
        let mut store = open_store(tmp.path());
        store
            .save_entry(ScheduleEntry::new("t1", 100, "c", "e"))
            .unwrap();
        store
            .save_entry(ScheduleEntry::new("t2", 200, "c", "e"))
            .unwrap();
        store.clear_schedule().unwrap();
        assert_eq!(store.entry_count(), 0);
        assert!(store.query_entries(i64::MIN, i64::MAX).is_empty());
    }

    #[test]
    fn reopen_round_trips_all_collections() {
        let tmp = tempdir().unwrap();
        let clock_id;
        {
            let mut store = open_store(tmp.path());
            let clock = ClockTemplate::new("Persisted", None).add_element(SlotKind::Music, 0);
            clock_id = clock.id.clone();
            store.save_clock(clock).unwrap();
            store
                .save_rule(SeparationRule::new("R", RuleKind::Track, 180))
                .unwrap();
            store
                .save_entry(ScheduleEntry::new("t1", 42, &clock_id, "e"))
                .unwrap();
            store
                .save_config(SchedulerConfig {
                    default_clock: Some(clock_id.clone()),
                })
                .unwrap();
            store.close();
        }
        let mut store = open_store(tmp.path());
        assert_eq!(store.get_clock(&clock_id).unwrap().element_count(), 1);
        assert_eq!(store.rules().len(), 1);
        assert_eq!(store.entry_count(), 1);
        assert_eq!(store.config().unwrap().default_clock, Some(clock_id));
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(CLOCKS_FILE), "{not json").unwrap();
        let store = open_store(tmp.path());
        assert!(store.clocks().is_empty());
    }

    #[test]
    fn config_materialises_default_on_first_read() {
        let tmp = tempdir().unwrap();
        let mut store = open_store(tmp.path());
        let cfg = store.config().unwrap();
        assert!(cfg.default_clock.is_none());
        assert!(tmp.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn seed_defaults_populates_clock_and_rules() {
        let tmp = tempdir().unwrap();
        let mut store = open_store(tmp.path());
        store.seed_defaults().unwrap();

        assert_eq!(store.clocks().len(), 1);
        let clock = &store.clocks()[0];
        assert_eq!(clock.name, "Default Hour");
        assert_eq!(clock.element_count(), 19);
        // interstitials sit at their fixed minutes
        let kind_at = |pos: u32| {
            clock
                .elements
                .iter()
                .find(|e| e.position == pos)
                .map(|e| e.kind)
        };
        assert_eq!(kind_at(8), Some(SlotKind::Sweeper));
        assert_eq!(kind_at(17), Some(SlotKind::Jingle));
        assert_eq!(kind_at(26), Some(SlotKind::Id));
        assert_eq!(kind_at(35), Some(SlotKind::Sweeper));
        assert_eq!(kind_at(44), Some(SlotKind::Jingle));
        assert_eq!(kind_at(53), Some(SlotKind::Id));

        assert_eq!(store.rules().len(), 3);
        let minutes: Vec<i64> = store.rules().iter().map(|r| r.min_minutes).collect();
        assert_eq!(minutes, vec![60, 180, 15]);
    }

    #[test]
    fn seed_defaults_twice_is_a_noop() {
        let tmp = tempdir().unwrap();
        let mut store = open_store(tmp.path());
        store.seed_defaults().unwrap();
        store.seed_defaults().unwrap();
        assert_eq!(store.clocks().len(), 1);
        assert_eq!(store.rules().len(), 3);
    }

    #[test]
    fn seed_skipped_when_any_clock_exists() {
        let tmp = tempdir().unwrap();
        let mut store = open_store(tmp.path());
        store
            .save_clock(ClockTemplate::new("Custom", None))
            .unwrap();
        store.seed_defaults().unwrap();
        assert_eq!(store.clocks().len(), 1);
        assert_eq!(store.clocks()[0].name, "Custom");
        // rules were still empty, so those seed
        assert_eq!(store.rules().len(), 3);
    }
}
