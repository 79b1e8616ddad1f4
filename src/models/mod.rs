//! Data models for the estimate pricing engine.
//!
//! Inbound and outbound value objects: the [`CalculationInput`] contract
//! from the API layer and the [`CalculationResult`] the engine hands back
//! for persistence.

mod calculation_input;
mod calculation_result;

pub use calculation_input::{
    CalculationInput, CalculationLimits, CrewMember, EquipmentItem, JobConditions, Margins,
    TravelDetails,
};
pub use calculation_result::{
    CalculationResult, CostComponents, EquipmentBreakdown, LaborBreakdown,
    SeasonalAdjustmentApplied, TravelBreakdown,
};
