//! Calculation input model and pre-calculation validation.
//!
//! A [`CalculationInput`] is the inbound contract from the API layer. The
//! rates it carries are treated as already resolved by the deterministic
//! calculator; the orchestrator overwrites them from the rate snapshot
//! before any arithmetic runs. Validation happens once, up front — every
//! rejection is an `InvalidInput` the caller can correct and resubmit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

/// Travel distance and time for reaching the job site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelDetails {
    /// One-way distance in miles.
    pub miles: Decimal,
    /// Estimated travel time in minutes.
    pub minutes: u32,
    /// Cost per mile for the vehicle; resolved from the snapshot.
    #[serde(default)]
    pub vehicle_rate_per_mile: Decimal,
    /// Driver's hourly rate for travel time; resolved from the snapshot.
    #[serde(default)]
    pub driver_hourly_rate: Decimal,
}

/// One crew member on the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// The role worked, e.g. "climber" or "groundsman".
    pub role: String,
    /// Hourly rate; resolved from the snapshot by role.
    #[serde(default)]
    pub hourly_rate: Decimal,
}

/// One piece of equipment used on the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    /// The equipment identifier, e.g. "chipper_12in".
    pub equipment_id: String,
    /// Hourly rate; resolved from the snapshot by equipment id.
    #[serde(default)]
    pub hourly_rate: Decimal,
}

/// Margin percentages layered onto direct costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    /// Overhead percentage, e.g. 25.0 for 25%.
    pub overhead_percent: Decimal,
    /// Profit margin percentage.
    pub profit_percent: Decimal,
    /// Safety buffer percentage.
    pub safety_buffer_percent: Decimal,
}

/// Job condition flags selecting the labor multiplier.
///
/// `emergency` and `weekend` are mutually exclusive on input; the
/// calculator additionally enforces the priority emergency > weekend >
/// overtime in case both ever reach it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConditions {
    /// Emergency call-out (2.5x labor).
    #[serde(default)]
    pub emergency: bool,
    /// Weekend work (2.0x labor).
    #[serde(default)]
    pub weekend: bool,
    /// Overtime work (1.5x labor).
    #[serde(default)]
    pub overtime: bool,
}

/// Ceilings applied during input validation.
///
/// Defaults match the production configuration: 500 miles of travel,
/// 16 estimated hours, crews of up to 10.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationLimits {
    /// Maximum allowed travel distance in miles.
    pub max_travel_miles: Decimal,
    /// Maximum allowed estimated hours.
    pub max_estimate_hours: Decimal,
    /// Maximum allowed crew size.
    pub max_crew_size: usize,
}

impl Default for CalculationLimits {
    fn default() -> Self {
        Self {
            max_travel_miles: Decimal::from(500),
            max_estimate_hours: Decimal::from(16),
            max_crew_size: 10,
        }
    }
}

fn default_overhead_setting() -> String {
    "standard".to_string()
}

/// The complete input for one estimate calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Travel distance, time, and rates.
    pub travel: TravelDetails,
    /// Vehicle type used for travel-rate resolution.
    pub vehicle_type: String,
    /// Overhead settings scenario name; defaults to "standard".
    #[serde(default = "default_overhead_setting")]
    pub overhead_setting: String,
    /// The crew roster.
    pub crew: Vec<CrewMember>,
    /// Equipment used on the job; may be empty.
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
    /// Estimated work hours.
    pub hours: Decimal,
    /// Flat disposal fee.
    #[serde(default)]
    pub disposal_fee: Decimal,
    /// Flat permit fee.
    #[serde(default)]
    pub permit_fee: Decimal,
    /// Margin percentages; overwritten by resolved overhead settings
    /// when the orchestrator runs.
    pub margins: Margins,
    /// Labor condition flags.
    #[serde(default)]
    pub conditions: JobConditions,
}

impl CalculationInput {
    /// Validates the input against business rules and `limits`.
    ///
    /// Runs before any calculation; a failure here is terminal for the
    /// invocation and never retried by the engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] naming the offending field.
    pub fn validate(&self, limits: &CalculationLimits) -> EngineResult<()> {
        if self.travel.miles.is_sign_negative() {
            return Err(invalid("travel.miles", "cannot be negative"));
        }
        if self.travel.miles > limits.max_travel_miles {
            return Err(invalid(
                "travel.miles",
                &format!("exceeds maximum of {} miles", limits.max_travel_miles),
            ));
        }
        if self.hours <= Decimal::ZERO {
            return Err(invalid("hours", "must be greater than zero"));
        }
        if self.hours > limits.max_estimate_hours {
            return Err(invalid(
                "hours",
                &format!("exceeds maximum of {} hours", limits.max_estimate_hours),
            ));
        }
        if self.crew.is_empty() {
            return Err(invalid("crew", "at least one crew member is required"));
        }
        if self.crew.len() > limits.max_crew_size {
            return Err(invalid(
                "crew",
                &format!(
                    "crew size {} exceeds maximum of {}",
                    self.crew.len(),
                    limits.max_crew_size
                ),
            ));
        }
        if self.conditions.emergency && self.conditions.weekend {
            return Err(invalid(
                "conditions",
                "emergency and weekend are mutually exclusive",
            ));
        }
        for member in &self.crew {
            if member.hourly_rate.is_sign_negative() {
                return Err(invalid(
                    "crew.hourly_rate",
                    &format!("negative rate for role '{}'", member.role),
                ));
            }
        }
        for item in &self.equipment {
            if item.hourly_rate.is_sign_negative() {
                return Err(invalid(
                    "equipment.hourly_rate",
                    &format!("negative rate for equipment '{}'", item.equipment_id),
                ));
            }
        }
        if self.disposal_fee.is_sign_negative() {
            return Err(invalid("disposal_fee", "cannot be negative"));
        }
        if self.permit_fee.is_sign_negative() {
            return Err(invalid("permit_fee", "cannot be negative"));
        }
        if self.travel.vehicle_rate_per_mile.is_sign_negative() {
            return Err(invalid("travel.vehicle_rate_per_mile", "cannot be negative"));
        }
        if self.travel.driver_hourly_rate.is_sign_negative() {
            return Err(invalid("travel.driver_hourly_rate", "cannot be negative"));
        }
        self.margins.validate()?;
        Ok(())
    }
}

impl Margins {
    /// Rejects negative percentages.
    pub fn validate(&self) -> EngineResult<()> {
        if self.overhead_percent.is_sign_negative() {
            return Err(invalid("margins.overhead_percent", "cannot be negative"));
        }
        if self.profit_percent.is_sign_negative() {
            return Err(invalid("margins.profit_percent", "cannot be negative"));
        }
        if self.safety_buffer_percent.is_sign_negative() {
            return Err(invalid(
                "margins.safety_buffer_percent",
                "cannot be negative",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: message.to_string(),
    }
}
