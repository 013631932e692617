use crate::catalog::AssetType;
use crate::ids::fresh_id;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content kind of a clock slot: every track category, plus `break` which
/// reserves a position without scheduling any audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Music,
    Jingle,
    Sweeper,
    Promo,
    Id,
    Commercial,
    Break,
}

impl SlotKind {
    /// The track category this slot draws from. `Break` draws from nothing,
    /// so it never produces a schedule entry.
    pub fn asset_type(self) -> Option<AssetType> {
        match self {
            SlotKind::Music => Some(AssetType::Music),
            SlotKind::Jingle => Some(AssetType::Jingle),
            SlotKind::Sweeper => Some(AssetType::Sweeper),
            SlotKind::Promo => Some(AssetType::Promo),
            SlotKind::Id => Some(AssetType::Id),
            SlotKind::Commercial => Some(AssetType::Commercial),
            SlotKind::Break => None,
        }
    }

    /// Parse a slot kind from a string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "break" => Ok(SlotKind::Break),
            other => AssetType::from_str_loose(other)
                .map(SlotKind::from)
                .map_err(|_| {
                    format!(
                        "Unknown slot kind '{}'. Expected: music, jingle, sweeper, promo, id, commercial, break",
                        s
                    )
                }),
        }
    }
}

impl From<AssetType> for SlotKind {
    fn from(t: AssetType) -> Self {
        match t {
            AssetType::Music => SlotKind::Music,
            AssetType::Jingle => SlotKind::Jingle,
            AssetType::Sweeper => SlotKind::Sweeper,
            AssetType::Promo => SlotKind::Promo,
            AssetType::Id => SlotKind::Id,
            AssetType::Commercial => SlotKind::Commercial,
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.asset_type() {
            Some(t) => write!(f, "{}", t),
            None => write!(f, "break"),
        }
    }
}

/// One slot in a clock template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockElement {
    pub id: String,
    pub kind: SlotKind,
    /// Minute offset from the top of the hour (0-59 by convention;
    /// not clamped — duplicates are allowed when the operator wants them).
    pub position: u32,
    /// Fixed duration in seconds, for slots with hard timing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_duration: Option<u32>,
    /// Optional rotation-category tag. Not yet used by candidate filtering;
    /// carried so templates round-trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A reusable hour-long programming pattern ("clock wheel").
///
/// Elements are kept sorted by position. All mutations are value-level:
/// they return a new template, which the caller persists with
/// `SchedulerStore::save_clock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockTemplate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub elements: Vec<ClockElement>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ClockTemplate {
    /// Create an empty template with a fresh id and current timestamps.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now().timestamp_millis();
        ClockTemplate {
            id: fresh_id("clock"),
            name: name.into(),
            description,
            elements: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Return a new template with an element added at `position`.
    /// Elements are re-sorted by position and `updated_at` is bumped.
    pub fn add_element(&self, kind: SlotKind, position: u32) -> ClockTemplate {
        self.add_element_full(kind, position, None, None)
    }

    /// As `add_element`, with the optional fields supplied.
    pub fn add_element_full(
        &self,
        kind: SlotKind,
        position: u32,
        fixed_duration: Option<u32>,
        category: Option<String>,
    ) -> ClockTemplate {
        let mut elements = self.elements.clone();
        elements.push(ClockElement {
            id: fresh_id("elem"),
            kind,
            position,
            fixed_duration,
            category,
        });
        elements.sort_by_key(|e| e.position);
        ClockTemplate {
            elements,
            updated_at: Utc::now().timestamp_millis(),
            ..self.clone()
        }
    }

    /// Return a new template with the given element removed.
    /// Removing an unknown id is a no-op (the element list is unchanged,
    /// but `updated_at` still bumps, matching the upsert-style contract).
    pub fn remove_element(&self, element_id: &str) -> ClockTemplate {
        let elements = self
            .elements
            .iter()
            .filter(|e| e.id != element_id)
            .cloned()
            .collect();
        ClockTemplate {
            elements,
            updated_at: Utc::now().timestamp_millis(),
            ..self.clone()
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}
