//! Effective-dated rate records, resolution, and seasonal rules.
//!
//! This module owns the "what rate applied on date X" half of the engine:
//! versioned rate records with inclusive validity windows, the resolver
//! that selects exactly one record per key and date, write-side guards for
//! the no-overlap and immutability invariants, recurring seasonal
//! adjustment windows, and the [`RateSnapshot`] the orchestrator reads.

mod record;
mod resolver;
mod seasonal;
mod snapshot;

pub use record::{
    EffectiveWindow, EquipmentRate, LaborRate, Lifecycle, OverheadSettings, VehicleRate, Versioned,
};
pub use resolver::{check_overlap, ensure_editable, resolve};
pub use seasonal::{SeasonWindow, SeasonalAdjustmentRule};
pub use snapshot::RateSnapshot;
