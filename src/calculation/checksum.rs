//! Checksum generation and verification.
//!
//! The checksum binds a calculation's numeric outcome to the formula
//! revision that produced it. The digest input is a canonical sorted-key
//! JSON encoding in which every amount is rendered as a fixed two-decimal
//! string, never as a binary float, so two independent implementations of
//! the formula produce byte-identical digest input for identical numbers.
//! The result timestamp is deliberately excluded.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::calculation::pipeline::FormulaOutcome;
use crate::calculation::rounding::round_to_cents;
use crate::models::CalculationResult;

/// The current formula revision.
///
/// Any change to the pipeline's arithmetic must bump this tag so
/// historical results remain verifiable against the formula that was
/// active when they were created.
pub const FORMULA_VERSION: &str = "1.0";

/// Renders an amount as the canonical fixed two-decimal string used in
/// digest input, e.g. `1234.50`.
fn canonical_amount(value: Decimal) -> String {
    format!("{:.2}", round_to_cents(value))
}

fn digest(
    direct_costs: Decimal,
    overhead: Decimal,
    safety_buffer: Decimal,
    profit: Decimal,
    final_total: Decimal,
    formula_version: &str,
) -> String {
    // BTreeMap serializes in sorted key order, which is the canonical form
    let mut fields: BTreeMap<&str, String> = BTreeMap::new();
    fields.insert("direct_costs", canonical_amount(direct_costs));
    fields.insert("overhead", canonical_amount(overhead));
    fields.insert("safety_buffer", canonical_amount(safety_buffer));
    fields.insert("profit", canonical_amount(profit));
    fields.insert("final_total", canonical_amount(final_total));
    fields.insert("formula_version", formula_version.to_string());

    let json = serde_json::to_string(&fields)
        .unwrap_or_else(|_| unreachable!("string map serialization cannot fail"));

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Computes the checksum for a formula outcome under [`FORMULA_VERSION`].
///
/// # Example
///
/// ```
/// use estimate_engine::calculation::{apply_formula_pipeline, checksum_for};
/// use estimate_engine::models::{CostComponents, Margins};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let outcome = apply_formula_pipeline(
///     &CostComponents {
///         travel: dec("47.50"),
///         labor: dec("360.00"),
///         equipment: dec("100.00"),
///         disposal: dec("150.00"),
///         permits: dec("75.00"),
///     },
///     &Margins {
///         overhead_percent: dec("25.0"),
///         profit_percent: dec("20.0"),
///         safety_buffer_percent: dec("10.0"),
///     },
/// );
/// let checksum = checksum_for(&outcome);
/// assert_eq!(checksum.len(), 64);
/// assert_eq!(checksum, checksum_for(&outcome));
/// ```
pub fn checksum_for(outcome: &FormulaOutcome) -> String {
    digest(
        outcome.direct_costs,
        outcome.overhead,
        outcome.safety_buffer,
        outcome.profit,
        outcome.final_total,
        FORMULA_VERSION,
    )
}

impl CalculationResult {
    /// Re-derives the checksum from this result's stored fields and
    /// compares it to the stored checksum.
    ///
    /// Returns false if any bound field — direct costs, overhead, safety
    /// buffer, profit, final total, or the formula version — was altered
    /// after the result was produced.
    pub fn verify_checksum(&self) -> bool {
        let expected = digest(
            self.direct_costs,
            self.overhead,
            self.safety_buffer,
            self.profit,
            self.final_total,
            &self.formula_version,
        );
        expected == self.checksum
    }
}
