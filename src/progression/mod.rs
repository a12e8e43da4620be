//! Progression domain — per-level cost curves and bulk-upgrade math.
//!
//! Pure functions only; no systems. The economy domain calls these to
//! validate stat-upgrade requests, the UI calls them for price previews.

pub mod cost;

pub use cost::{bulk_upgrade, is_unlocked, step_cost, BulkQuote};
