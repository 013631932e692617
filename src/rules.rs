use crate::catalog::{Catalog, Track};
use crate::ids::fresh_id;
use crate::schedule::ScheduleEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a separation rule compares between two plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Same artist string (case-sensitive, exact).
    Artist,
    /// Same asset category.
    Category,
    /// The identical track (same id).
    Track,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Artist => write!(f, "artist"),
            RuleKind::Category => write!(f, "category"),
            RuleKind::Track => write!(f, "track"),
        }
    }
}

impl RuleKind {
    /// Parse a rule kind from a string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "artist" => Ok(RuleKind::Artist),
            "category" => Ok(RuleKind::Category),
            "track" => Ok(RuleKind::Track),
            _ => Err(format!(
                "Unknown rule kind '{}'. Expected: artist, category, track",
                s
            )),
        }
    }
}

/// A constraint forbidding two colliding plays within `min_minutes`.
///
/// `min_minutes` is stored as given. A zero or negative window matches no
/// prior play, so the rule degrades to a no-op rather than being rejected
/// at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeparationRule {
    pub id: String,
    pub name: String,
    pub kind: RuleKind,
    pub min_minutes: i64,
    pub enabled: bool,
}

impl SeparationRule {
    /// Create an enabled rule with a fresh id.
    pub fn new(name: impl Into<String>, kind: RuleKind, min_minutes: i64) -> Self {
        SeparationRule {
            id: fresh_id("rule"),
            name: name.into(),
            kind,
            min_minutes,
            enabled: true,
        }
    }
}

/// Check whether `track` may play, given the recent schedule entries and the
/// active rules.
///
/// Windows are measured from `now_ms`, the moment of generation, not the
/// slot being resolved. Separation therefore loosens for slots far from
/// `now_ms`; callers generating far ahead should know this.
///
/// A track passes iff, for every enabled rule, no entry inside that rule's
/// window collides under the rule's kind. Entries whose track id is missing
/// from the catalog are skipped (dangling references are tolerated).
pub fn passes_separation(
    track: &Track,
    recent: &[&ScheduleEntry],
    rules: &[SeparationRule],
    catalog: &Catalog,
    now_ms: i64,
) -> bool {
    for rule in rules {
        if !rule.enabled {
            continue;
        }
        let window_ms = rule.min_minutes * 60 * 1000;

        for entry in recent {
            let age = now_ms - entry.scheduled_time;
            if age > window_ms {
                continue; // outside this rule's window
            }
            let Some(entry_track) = catalog.get(&entry.track_id) else {
                continue;
            };
            let collides = match rule.kind {
                RuleKind::Artist => entry_track.artist == track.artist,
                RuleKind::Category => entry_track.asset_type == track.asset_type,
                RuleKind::Track => entry_track.id == track.id,
            };
            if collides {
                return false;
            }
        }
    }
    true
}
