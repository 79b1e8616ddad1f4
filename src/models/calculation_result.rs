//! Calculation result models.
//!
//! A [`CalculationResult`] captures every output of the pricing pipeline —
//! itemized breakdowns, the margin layering, the final rounded total, and
//! the checksum binding them together. It is immutable once produced and
//! is persisted verbatim alongside the inputs that generated it so a
//! stored estimate can be independently re-verified later.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::Margins;

/// Itemized travel cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelBreakdown {
    /// `miles * vehicle_rate_per_mile`, cent-rounded.
    pub mileage_cost: Decimal,
    /// `(minutes / 60) * driver_hourly_rate`, cent-rounded.
    pub time_cost: Decimal,
    /// Cent-rounded sum of the two components.
    pub total: Decimal,
}

/// Itemized labor cost.
///
/// `multipliers_applied` is a [`BTreeMap`] so audit output iterates in
/// sorted-key order on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborBreakdown {
    /// Sum of `hours * hourly_rate` across the crew, cent-rounded.
    pub base_cost: Decimal,
    /// The multiplier actually applied, keyed by name (at most one).
    pub multipliers_applied: BTreeMap<String, Decimal>,
    /// Base cost with the multiplier applied, cent-rounded.
    pub total: Decimal,
}

/// Itemized equipment cost, keyed by equipment id in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentBreakdown {
    /// Per-item cost (`hours * hourly_rate`, cent-rounded each).
    pub itemized: BTreeMap<String, Decimal>,
    /// Cent-rounded sum of the items.
    pub total: Decimal,
}

/// The closed set of direct cost components.
///
/// A fixed struct rather than a keyed map: decimal addition is exact, so
/// a fixed field set reproduces the original sorted-key summation
/// bit-for-bit without needing to sort anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostComponents {
    /// Travel cost total.
    pub travel: Decimal,
    /// Labor cost total.
    pub labor: Decimal,
    /// Equipment cost total.
    pub equipment: Decimal,
    /// Disposal fee.
    pub disposal: Decimal,
    /// Permit fee.
    pub permits: Decimal,
}

impl CostComponents {
    /// Exact (unrounded) sum of the five components.
    pub fn exact_sum(&self) -> Decimal {
        self.travel + self.labor + self.equipment + self.disposal + self.permits
    }
}

/// A seasonal adjustment that was applied to the subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalAdjustmentApplied {
    /// The rule name, e.g. "storm_season".
    pub name: String,
    /// The percentage applied.
    pub percent: Decimal,
    /// The cent-rounded amount added to the subtotal.
    pub amount: Decimal,
}

/// The complete, immutable result of one estimate calculation.
///
/// # Example
///
/// ```
/// use estimate_engine::models::{
///     CalculationResult, CostComponents, EquipmentBreakdown, LaborBreakdown,
///     Margins, TravelBreakdown,
/// };
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
/// use uuid::Uuid;
///
/// let result = CalculationResult {
///     calculation_id: Uuid::new_v4(),
///     calculated_at: Utc::now(),
///     formula_version: "1.0".to_string(),
///     travel: TravelBreakdown {
///         mileage_cost: Decimal::ZERO,
///         time_cost: Decimal::ZERO,
///         total: Decimal::ZERO,
///     },
///     labor: LaborBreakdown {
///         base_cost: Decimal::ZERO,
///         multipliers_applied: BTreeMap::new(),
///         total: Decimal::ZERO,
///     },
///     equipment: EquipmentBreakdown {
///         itemized: BTreeMap::new(),
///         total: Decimal::ZERO,
///     },
///     disposal_fee: Decimal::ZERO,
///     permit_fee: Decimal::ZERO,
///     components: CostComponents {
///         travel: Decimal::ZERO,
///         labor: Decimal::ZERO,
///         equipment: Decimal::ZERO,
///         disposal: Decimal::ZERO,
///         permits: Decimal::ZERO,
///     },
///     direct_costs: Decimal::ZERO,
///     overhead: Decimal::ZERO,
///     safety_buffer: Decimal::ZERO,
///     profit: Decimal::ZERO,
///     subtotal: Decimal::ZERO,
///     final_total: Decimal::ZERO,
///     margins_applied: Margins {
///         overhead_percent: Decimal::ZERO,
///         profit_percent: Decimal::ZERO,
///         safety_buffer_percent: Decimal::ZERO,
///     },
///     seasonal_adjustment: None,
///     checksum: String::new(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this invocation.
    pub calculation_id: Uuid,
    /// When the calculation ran. Stamped on output only; excluded from
    /// the checksum so it never affects verification.
    pub calculated_at: DateTime<Utc>,
    /// The formula revision that produced this result.
    pub formula_version: String,
    /// Travel cost breakdown.
    pub travel: TravelBreakdown,
    /// Labor cost breakdown.
    pub labor: LaborBreakdown,
    /// Equipment cost breakdown.
    pub equipment: EquipmentBreakdown,
    /// Disposal fee carried into direct costs.
    pub disposal_fee: Decimal,
    /// Permit fee carried into direct costs.
    pub permit_fee: Decimal,
    /// The assembled direct cost components.
    pub components: CostComponents,
    /// Cent-rounded sum of the direct cost components.
    pub direct_costs: Decimal,
    /// Overhead amount layered on direct costs.
    pub overhead: Decimal,
    /// Safety buffer amount layered on the running subtotal.
    pub safety_buffer: Decimal,
    /// Profit amount layered on the running subtotal.
    pub profit: Decimal,
    /// Pre-rounding subtotal (after any seasonal adjustment).
    pub subtotal: Decimal,
    /// The final total, always a multiple of $5.
    pub final_total: Decimal,
    /// The margin percentages actually used, after threshold adjustments.
    pub margins_applied: Margins,
    /// The seasonal adjustment applied, if any rule matched.
    pub seasonal_adjustment: Option<SeasonalAdjustmentApplied>,
    /// SHA-256 digest binding the numeric fields and formula version.
    pub checksum: String,
}
