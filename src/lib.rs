//! clockwheel — Scheduling engine for a radio-automation console.
//!
//! Clock templates, separation rules, and the rule-constrained auto-fill
//! algorithm that turns a track catalog into a conflict-checked rotation.
//! The UI layer consumes this crate; playback and catalog harvesting live
//! elsewhere.

pub mod autofill;
pub mod catalog;
pub mod clock;
pub mod generator;
pub mod ids;
pub mod rules;
pub mod schedule;
pub mod store;
