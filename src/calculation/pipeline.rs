//! The overhead / safety-buffer / profit formula pipeline.
//!
//! The formula is defined stage by stage, not as one closed-form
//! expression: each stage cent-rounds its own contribution before the next
//! stage runs. Deferring any of those roundings changes the final total,
//! so the order here is load-bearing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::rounding::{percentage_of, round_to_cents, round_to_nearest_five};
use crate::models::{CostComponents, Margins};

/// The numeric outcome of the formula pipeline.
///
/// These six fields (five amounts plus the formula version) are exactly
/// what the checksum binds together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaOutcome {
    /// Cent-rounded sum of the direct cost components.
    pub direct_costs: Decimal,
    /// `direct_costs * overhead_percent`, cent-rounded.
    pub overhead: Decimal,
    /// Buffer on the running subtotal, cent-rounded.
    pub safety_buffer: Decimal,
    /// Profit on the running subtotal, cent-rounded.
    pub profit: Decimal,
    /// Pre-rounding subtotal.
    pub subtotal: Decimal,
    /// Subtotal rounded half-up to the nearest $5.
    pub final_total: Decimal,
}

/// Applies the deterministic formula pipeline.
///
/// 1. Sum direct costs, cent-rounded.
/// 2. Overhead = percentage of direct costs; add to running subtotal.
/// 3. Safety buffer = percentage of the running subtotal; add.
/// 4. Profit = percentage of the running subtotal; add.
/// 5. Final total = subtotal rounded to the nearest $5.
///
/// # Example
///
/// ```
/// use estimate_engine::calculation::apply_formula_pipeline;
/// use estimate_engine::models::{CostComponents, Margins};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let components = CostComponents {
///     travel: dec("47.50"),
///     labor: dec("360.00"),
///     equipment: dec("100.00"),
///     disposal: dec("150.00"),
///     permits: dec("75.00"),
/// };
/// let margins = Margins {
///     overhead_percent: dec("25.0"),
///     profit_percent: dec("20.0"),
///     safety_buffer_percent: dec("10.0"),
/// };
/// let outcome = apply_formula_pipeline(&components, &margins);
/// assert_eq!(outcome.direct_costs, dec("732.50"));
/// assert_eq!(outcome.final_total % dec("5"), Decimal::ZERO);
/// ```
pub fn apply_formula_pipeline(components: &CostComponents, margins: &Margins) -> FormulaOutcome {
    let direct_costs = round_to_cents(components.exact_sum());

    let overhead = percentage_of(direct_costs, margins.overhead_percent);
    let with_overhead = direct_costs + overhead;

    let safety_buffer = percentage_of(with_overhead, margins.safety_buffer_percent);
    let with_buffer = with_overhead + safety_buffer;

    let profit = percentage_of(with_buffer, margins.profit_percent);
    let subtotal = with_buffer + profit;

    let final_total = round_to_nearest_five(subtotal);

    FormulaOutcome {
        direct_costs,
        overhead,
        safety_buffer,
        profit,
        subtotal,
        final_total,
    }
}
