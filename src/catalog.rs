use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Asset category of a catalog track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Music,
    Jingle,
    Sweeper,
    Promo,
    Id,
    Commercial,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Music => write!(f, "music"),
            AssetType::Jingle => write!(f, "jingle"),
            AssetType::Sweeper => write!(f, "sweeper"),
            AssetType::Promo => write!(f, "promo"),
            AssetType::Id => write!(f, "id"),
            AssetType::Commercial => write!(f, "commercial"),
        }
    }
}

impl AssetType {
    /// Parse an asset type from a string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "music" => Ok(AssetType::Music),
            "jingle" => Ok(AssetType::Jingle),
            "sweeper" => Ok(AssetType::Sweeper),
            "promo" => Ok(AssetType::Promo),
            "id" => Ok(AssetType::Id),
            "commercial" => Ok(AssetType::Commercial),
            _ => Err(format!(
                "Unknown asset type '{}'. Expected: music, jingle, sweeper, promo, id, commercial",
                s
            )),
        }
    }
}

/// A catalog track. Supplied by the library/harvesting layer; the scheduler
/// never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub artist: String,
    pub asset_type: AssetType,
}

impl Track {
    pub fn new(id: impl Into<String>, artist: impl Into<String>, asset_type: AssetType) -> Self {
        Track {
            id: id.into(),
            artist: artist.into(),
            asset_type,
        }
    }
}

/// Read-only snapshot of the available tracks.
///
/// Iteration order is insertion order — the auto-fill engine picks the
/// *first* candidate that passes separation, so order is part of the
/// contract, not an implementation detail.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        let by_id = tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        Catalog { tracks, by_id }
    }

    /// Look up a track by id. Missing ids are normal (dangling schedule
    /// references), not an error.
    pub fn get(&self, id: &str) -> Option<&Track> {
        self.by_id.get(id).map(|&i| &self.tracks[i])
    }

    /// All tracks, in insertion order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Tracks of the given category, in insertion order.
    pub fn of_type(&self, asset_type: AssetType) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|t| t.asset_type == asset_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
