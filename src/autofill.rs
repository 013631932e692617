//! Auto-Fill engine — resolves the slots of one clock hour to concrete
//! catalog tracks under the separation rules.

use crate::catalog::Catalog;
use crate::clock::ClockTemplate;
use crate::rules::{passes_separation, SeparationRule};
use crate::schedule::ScheduleEntry;

/// Milliseconds in one minute.
pub const MINUTE_MS: i64 = 60 * 1000;

/// Milliseconds in one hour.
pub const HOUR_MS: i64 = 60 * MINUTE_MS;

/// How far back the engine looks for separation conflicts.
pub const LOOKBACK_MS: i64 = 24 * HOUR_MS;

/// The auto-fill engine. Owns the RNG used for fallback selection so a
/// seeded engine generates reproducibly.
pub struct AutoFill {
    rng: fastrand::Rng,
}

impl AutoFill {
    pub fn new() -> Self {
        AutoFill {
            rng: fastrand::Rng::new(),
        }
    }

    /// An engine with a fixed seed, for reproducible generation.
    pub fn with_seed(seed: u64) -> Self {
        AutoFill {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Fill one clock hour starting at `hour_start` (ms epoch).
    ///
    /// `history` is the already persisted lookback window (entries strictly
    /// before `hour_start`); entries placed earlier in this call are also
    /// checked, so intra-run separation holds. `now_ms` is the moment of
    /// generation, the basis for all rule windows.
    ///
    /// Elements are resolved in ascending position order. A slot whose
    /// candidate pool is empty (`break`, or no tracks of its category) is
    /// silently skipped. When no candidate passes the rules, one is drawn
    /// at random from the pool so the slot is still covered.
    pub fn fill_hour(
        &mut self,
        clock: &ClockTemplate,
        hour_start: i64,
        catalog: &Catalog,
        rules: &[SeparationRule],
        history: &[ScheduleEntry],
        now_ms: i64,
    ) -> Vec<ScheduleEntry> {
        let mut placed: Vec<ScheduleEntry> = Vec::new();

        for element in &clock.elements {
            let element_time = hour_start + element.position as i64 * MINUTE_MS;

            let candidates = match element.kind.asset_type() {
                Some(asset_type) => catalog.of_type(asset_type),
                None => Vec::new(), // break slots schedule nothing
            };
            if candidates.is_empty() {
                continue;
            }

            let recent: Vec<&ScheduleEntry> = history.iter().chain(placed.iter()).collect();

            let mut selected = candidates
                .iter()
                .find(|t| passes_separation(t, &recent, rules, catalog, now_ms))
                .copied();

            // Fallback: coverage beats separation. Rules can be unsatisfiable
            // with a small catalog; the slot still gets a track.
            if selected.is_none() {
                selected = Some(candidates[self.rng.usize(..candidates.len())]);
            }

            if let Some(track) = selected {
                placed.push(ScheduleEntry::new(
                    &track.id,
                    element_time,
                    &clock.id,
                    &element.id,
                ));
            }
        }

        placed
    }
}

impl Default for AutoFill {
    fn default() -> Self {
        Self::new()
    }
}
