//! Equipment cost calculation.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::calculation::rounding::round_to_cents;
use crate::models::{EquipmentBreakdown, EquipmentItem};

/// Calculates equipment cost for the job.
///
/// Each item costs `hours * hourly_rate`, cent-rounded per item. The
/// itemized breakdown is keyed by equipment id in a sorted map so output
/// is deterministic regardless of how the caller ordered the list; an id
/// listed twice accumulates into one entry.
///
/// # Example
///
/// ```
/// use estimate_engine::calculation::calculate_equipment_cost;
/// use estimate_engine::models::EquipmentItem;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let items = vec![EquipmentItem {
///     equipment_id: "chipper_12in".to_string(),
///     hourly_rate: dec("25.00"),
/// }];
/// let breakdown = calculate_equipment_cost(dec("4.0"), &items);
/// assert_eq!(breakdown.total, dec("100.00"));
/// ```
pub fn calculate_equipment_cost(hours: Decimal, items: &[EquipmentItem]) -> EquipmentBreakdown {
    let mut itemized: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut total = Decimal::ZERO;

    for item in items {
        let cost = round_to_cents(hours * item.hourly_rate);
        *itemized
            .entry(item.equipment_id.clone())
            .or_insert(Decimal::ZERO) += cost;
        total += cost;
    }

    EquipmentBreakdown {
        itemized,
        total: round_to_cents(total),
    }
}
