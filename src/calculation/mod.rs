//! The deterministic calculation pipeline.
//!
//! This module contains the pure pricing pipeline: exact decimal rounding
//! utilities, travel, labor, and equipment cost assembly, the
//! overhead/safety-buffer/profit layering with final $5 rounding, the
//! checksum binding a result to its formula version, and the orchestrator
//! that wires rate resolution and seasonal adjustments around the
//! pipeline.

mod checksum;
mod equipment;
mod labor;
mod orchestrator;
mod pipeline;
mod rounding;
mod travel;

pub use checksum::{FORMULA_VERSION, checksum_for};
pub use equipment::calculate_equipment_cost;
pub use labor::{
    calculate_labor_cost, emergency_multiplier, overtime_multiplier, select_multiplier,
    weekend_multiplier,
};
pub use orchestrator::{calculate_estimate, calculate_estimate_with_limits};
pub use pipeline::{FormulaOutcome, apply_formula_pipeline};
pub use rounding::{
    add_percentage, format_currency, parse_currency, percentage_of, round_down_to_five,
    round_to_cents, round_to_nearest_five, round_to_nearest_ten, round_up_to_five,
};
pub use travel::calculate_travel_cost;
