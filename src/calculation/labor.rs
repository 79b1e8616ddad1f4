//! Labor cost calculation and multiplier selection.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::calculation::rounding::round_to_cents;
use crate::models::{CrewMember, JobConditions, LaborBreakdown};

/// Emergency call-out multiplier (2.5x).
pub fn emergency_multiplier() -> Decimal {
    Decimal::new(25, 1)
}

/// Weekend work multiplier (2.0x).
pub fn weekend_multiplier() -> Decimal {
    Decimal::new(20, 1)
}

/// Overtime multiplier (1.5x).
pub fn overtime_multiplier() -> Decimal {
    Decimal::new(15, 1)
}

/// Selects the single labor multiplier for the given job conditions.
///
/// Priority is emergency > weekend > overtime. Input validation already
/// guarantees emergency and weekend are mutually exclusive, but the
/// priority order is enforced here regardless so a bypassed validator can
/// never double-apply or pick the wrong multiplier.
pub fn select_multiplier(conditions: JobConditions) -> Option<(&'static str, Decimal)> {
    if conditions.emergency {
        Some(("emergency", emergency_multiplier()))
    } else if conditions.weekend {
        Some(("weekend", weekend_multiplier()))
    } else if conditions.overtime {
        Some(("overtime", overtime_multiplier()))
    } else {
        None
    }
}

/// Calculates labor cost for the crew.
///
/// The base cost sums `hours * hourly_rate` across the crew exactly —
/// member contributions are not rounded individually. At most one
/// multiplier applies, selected by [`select_multiplier`], against the full
/// unrounded base; the result is then cent-rounded. Applied multipliers
/// are recorded in a sorted-key map for stable audit output.
///
/// # Example
///
/// ```
/// use estimate_engine::calculation::calculate_labor_cost;
/// use estimate_engine::models::{CrewMember, JobConditions};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let crew = vec![
///     CrewMember { role: "climber".to_string(), hourly_rate: dec("45.00") },
///     CrewMember { role: "groundsman".to_string(), hourly_rate: dec("45.00") },
/// ];
/// let breakdown = calculate_labor_cost(dec("4.0"), &crew, JobConditions::default());
/// assert_eq!(breakdown.total, dec("360.00"));
/// ```
pub fn calculate_labor_cost(
    hours: Decimal,
    crew: &[CrewMember],
    conditions: JobConditions,
) -> LaborBreakdown {
    let mut base_cost = Decimal::ZERO;
    for member in crew {
        base_cost += hours * member.hourly_rate;
    }

    let mut multipliers_applied = BTreeMap::new();
    let total = match select_multiplier(conditions) {
        Some((name, multiplier)) => {
            multipliers_applied.insert(name.to_string(), multiplier);
            base_cost * multiplier
        }
        None => base_cost,
    };

    LaborBreakdown {
        base_cost: round_to_cents(base_cost),
        multipliers_applied,
        total: round_to_cents(total),
    }
}
