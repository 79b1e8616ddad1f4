//! Travel cost calculation.

use rust_decimal::Decimal;

use crate::calculation::rounding::round_to_cents;
use crate::models::TravelBreakdown;

/// Calculates travel cost from mileage and travel time.
///
/// Both components are cent-rounded individually, then summed and
/// cent-rounded again — the stage-by-stage rounding is part of the formula
/// definition and must not be deferred.
///
/// # Example
///
/// ```
/// use estimate_engine::calculation::calculate_travel_cost;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let breakdown = calculate_travel_cost(dec("25.0"), 45, dec("0.85"), dec("35.00"));
/// assert_eq!(breakdown.mileage_cost, dec("21.25"));
/// assert_eq!(breakdown.time_cost, dec("26.25"));
/// assert_eq!(breakdown.total, dec("47.50"));
/// ```
pub fn calculate_travel_cost(
    miles: Decimal,
    minutes: u32,
    vehicle_rate_per_mile: Decimal,
    driver_hourly_rate: Decimal,
) -> TravelBreakdown {
    let mileage_cost = round_to_cents(miles * vehicle_rate_per_mile);

    let time_hours = Decimal::from(minutes) / Decimal::from(60);
    let time_cost = round_to_cents(time_hours * driver_hourly_rate);

    let total = round_to_cents(mileage_cost + time_cost);

    TravelBreakdown {
        mileage_cost,
        time_cost,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_travel_cost_components() {
        let breakdown = calculate_travel_cost(dec("25.0"), 45, dec("0.85"), dec("35.00"));
        assert_eq!(breakdown.mileage_cost, dec("21.25"));
        assert_eq!(breakdown.time_cost, dec("26.25"));
        assert_eq!(breakdown.total, dec("47.50"));
    }

    #[test]
    fn test_zero_travel_is_zero() {
        let breakdown = calculate_travel_cost(dec("0"), 0, dec("0.85"), dec("35.00"));
        assert_eq!(breakdown.total, dec("0.00"));
    }

    #[test]
    fn test_components_round_before_summing() {
        // 10.5 miles * 0.333 = 3.4965 -> 3.50; 10 min * 40/hr = 6.6666.. -> 6.67
        let breakdown = calculate_travel_cost(dec("10.5"), 10, dec("0.333"), dec("40.00"));
        assert_eq!(breakdown.mileage_cost, dec("3.50"));
        assert_eq!(breakdown.time_cost, dec("6.67"));
        assert_eq!(breakdown.total, dec("10.17"));
    }

    #[test]
    fn test_minutes_convert_to_fractional_hours() {
        let breakdown = calculate_travel_cost(dec("0"), 90, dec("0"), dec("35.00"));
        assert_eq!(breakdown.time_cost, dec("52.50"));
    }
}
