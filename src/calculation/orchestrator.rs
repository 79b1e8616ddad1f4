//! The calculation orchestrator.
//!
//! Enriches a raw calculation input with effective-dated rates from an
//! injected [`RateSnapshot`], runs the deterministic pipeline, applies any
//! active seasonal adjustment to the pre-rounding subtotal, and assembles
//! the final [`CalculationResult`]. A calculation either completes fully
//! or fails atomically; partial results are never surfaced.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::calculation::checksum::{FORMULA_VERSION, checksum_for};
use crate::calculation::equipment::calculate_equipment_cost;
use crate::calculation::labor::calculate_labor_cost;
use crate::calculation::pipeline::apply_formula_pipeline;
use crate::calculation::rounding::{round_to_cents, round_to_nearest_five};
use crate::calculation::travel::calculate_travel_cost;
use crate::error::EngineResult;
use crate::models::{
    CalculationInput, CalculationLimits, CalculationResult, CostComponents, Margins,
    SeasonalAdjustmentApplied,
};
use crate::rates::RateSnapshot;

/// Calculates a complete estimate using default input limits.
///
/// `on_date` selects which rate versions apply; `None` means today. See
/// [`calculate_estimate_with_limits`] for the full pipeline description.
pub fn calculate_estimate(
    input: &CalculationInput,
    snapshot: &RateSnapshot,
    on_date: Option<NaiveDate>,
) -> EngineResult<CalculationResult> {
    calculate_estimate_with_limits(input, snapshot, on_date, &CalculationLimits::default())
}

/// Calculates a complete estimate.
///
/// Steps:
/// 1. Validate the input against `limits`.
/// 2. Resolve every crew role, equipment item, the vehicle type, and the
///    overhead settings for the calculation date — a single missing rate
///    aborts the whole calculation.
/// 3. Shift the overhead percentage if the resolved settings define
///    large-job or small-job hour thresholds.
/// 4. Run the deterministic travel/labor/equipment pipeline and the
///    margin layering.
/// 5. Apply the first matching seasonal adjustment rule, if any, to the
///    pre-rounding subtotal and re-round.
///
/// # Errors
///
/// * [`crate::error::EngineError::InvalidInput`] — validation failure.
/// * [`crate::error::EngineError::RateNotConfigured`] — a role, equipment
///   id, vehicle type, or setting name has no rate on the date.
/// * [`crate::error::EngineError::AmbiguousRate`] — the snapshot holds
///   overlapping windows for a key (data-integrity fault).
pub fn calculate_estimate_with_limits(
    input: &CalculationInput,
    snapshot: &RateSnapshot,
    on_date: Option<NaiveDate>,
    limits: &CalculationLimits,
) -> EngineResult<CalculationResult> {
    let calculation_date = on_date.unwrap_or_else(|| Utc::now().date_naive());

    input.validate(limits)?;

    let enriched = enrich_input(input, snapshot, calculation_date)?;

    let travel = calculate_travel_cost(
        enriched.travel.miles,
        enriched.travel.minutes,
        enriched.travel.vehicle_rate_per_mile,
        enriched.travel.driver_hourly_rate,
    );
    let labor = calculate_labor_cost(enriched.hours, &enriched.crew, enriched.conditions);
    let equipment = calculate_equipment_cost(enriched.hours, &enriched.equipment);

    let components = CostComponents {
        travel: travel.total,
        labor: labor.total,
        equipment: equipment.total,
        disposal: enriched.disposal_fee,
        permits: enriched.permit_fee,
    };

    let mut outcome = apply_formula_pipeline(&components, &enriched.margins);

    let seasonal_adjustment = match snapshot.first_seasonal_rule(calculation_date) {
        Some(rule) => {
            let amount = round_to_cents(
                outcome.subtotal * rule.adjustment_percent / Decimal::ONE_HUNDRED,
            );
            outcome.subtotal += amount;
            outcome.final_total = round_to_nearest_five(outcome.subtotal);
            debug!(
                rule = %rule.name,
                percent = %rule.adjustment_percent,
                amount = %amount,
                "applied seasonal adjustment"
            );
            Some(SeasonalAdjustmentApplied {
                name: rule.name.clone(),
                percent: rule.adjustment_percent,
                amount,
            })
        }
        None => None,
    };

    // checksum covers the outcome after any seasonal adjustment
    let checksum = checksum_for(&outcome);

    Ok(CalculationResult {
        calculation_id: Uuid::new_v4(),
        calculated_at: Utc::now(),
        formula_version: FORMULA_VERSION.to_string(),
        travel,
        labor,
        equipment,
        disposal_fee: enriched.disposal_fee,
        permit_fee: enriched.permit_fee,
        components,
        direct_costs: outcome.direct_costs,
        overhead: outcome.overhead,
        safety_buffer: outcome.safety_buffer,
        profit: outcome.profit,
        subtotal: outcome.subtotal,
        final_total: outcome.final_total,
        margins_applied: enriched.margins,
        seasonal_adjustment,
        checksum,
    })
}

/// Overwrites the input's rates with values resolved from the snapshot.
///
/// Whatever rates the caller supplied are ignored; the snapshot is the
/// single source of truth. Any unresolvable key aborts enrichment.
fn enrich_input(
    input: &CalculationInput,
    snapshot: &RateSnapshot,
    date: NaiveDate,
) -> EngineResult<CalculationInput> {
    let mut enriched = input.clone();

    for member in &mut enriched.crew {
        member.hourly_rate = snapshot.labor_rate(&member.role, date)?.hourly_rate;
    }

    for item in &mut enriched.equipment {
        item.hourly_rate = snapshot.equipment_rate(&item.equipment_id, date)?.hourly_rate;
    }

    let vehicle = snapshot.vehicle_rate(&enriched.vehicle_type, date)?;
    enriched.travel.vehicle_rate_per_mile = vehicle.rate_per_mile;
    enriched.travel.driver_hourly_rate = vehicle.driver_hourly_rate;

    let settings = snapshot.overhead(&enriched.overhead_setting, date)?;
    enriched.margins = adjusted_margins(settings, enriched.hours);

    Ok(enriched)
}

/// Derives the margins from resolved settings, shifting the overhead
/// percentage for jobs above the large-job or below the small-job hour
/// thresholds. A zero threshold disables its adjustment.
fn adjusted_margins(settings: &crate::rates::OverheadSettings, hours: Decimal) -> Margins {
    let mut overhead_percent = settings.overhead_percent;

    if settings.large_job_threshold_hours > Decimal::ZERO
        && hours > settings.large_job_threshold_hours
    {
        overhead_percent -= settings.large_job_discount_percent;
        debug!(
            %hours,
            discount = %settings.large_job_discount_percent,
            "large-job overhead discount applied"
        );
    } else if settings.small_job_threshold_hours > Decimal::ZERO
        && hours < settings.small_job_threshold_hours
    {
        overhead_percent += settings.small_job_premium_percent;
        debug!(
            %hours,
            premium = %settings.small_job_premium_percent,
            "small-job overhead premium applied"
        );
    }

    Margins {
        overhead_percent,
        profit_percent: settings.profit_percent,
        safety_buffer_percent: settings.safety_buffer_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{CrewMember, EquipmentItem, JobConditions, TravelDetails};
    use crate::rates::{
        EffectiveWindow, EquipmentRate, LaborRate, Lifecycle, OverheadSettings,
        SeasonWindow, SeasonalAdjustmentRule, VehicleRate,
    };
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_snapshot() -> RateSnapshot {
        let window = EffectiveWindow::open_from(date(2025, 1, 1));
        let mut snapshot = RateSnapshot::default();
        snapshot
            .add_labor_rate(LaborRate {
                role: "climber".to_string(),
                hourly_rate: dec("45.00"),
                window,
                lifecycle: Lifecycle::Active,
            })
            .unwrap();
        snapshot
            .add_labor_rate(LaborRate {
                role: "groundsman".to_string(),
                hourly_rate: dec("30.00"),
                window,
                lifecycle: Lifecycle::Active,
            })
            .unwrap();
        snapshot
            .add_equipment_rate(EquipmentRate {
                equipment_id: "chipper_12in".to_string(),
                hourly_rate: dec("25.00"),
                window,
                lifecycle: Lifecycle::Active,
            })
            .unwrap();
        snapshot
            .add_vehicle_rate(VehicleRate {
                vehicle_type: "chipper_truck".to_string(),
                rate_per_mile: dec("0.85"),
                driver_hourly_rate: dec("35.00"),
                window,
                lifecycle: Lifecycle::Active,
            })
            .unwrap();
        snapshot
            .add_overhead_settings(OverheadSettings::with_margins(
                "standard",
                dec("25.0"),
                dec("20.0"),
                dec("10.0"),
                window,
            ))
            .unwrap();
        snapshot
    }

    fn test_input() -> CalculationInput {
        CalculationInput {
            travel: TravelDetails {
                miles: dec("25.0"),
                minutes: 45,
                vehicle_rate_per_mile: Decimal::ZERO,
                driver_hourly_rate: Decimal::ZERO,
            },
            vehicle_type: "chipper_truck".to_string(),
            overhead_setting: "standard".to_string(),
            crew: vec![
                CrewMember {
                    role: "climber".to_string(),
                    hourly_rate: Decimal::ZERO,
                },
                CrewMember {
                    role: "groundsman".to_string(),
                    hourly_rate: Decimal::ZERO,
                },
            ],
            equipment: vec![EquipmentItem {
                equipment_id: "chipper_12in".to_string(),
                hourly_rate: Decimal::ZERO,
            }],
            hours: dec("4.0"),
            disposal_fee: dec("150.00"),
            permit_fee: dec("75.00"),
            margins: Margins {
                overhead_percent: Decimal::ZERO,
                profit_percent: Decimal::ZERO,
                safety_buffer_percent: Decimal::ZERO,
            },
            conditions: JobConditions::default(),
        }
    }

    /// OR-001: rates come from the snapshot, not the request
    #[test]
    fn test_rates_resolved_from_snapshot() {
        let result =
            calculate_estimate(&test_input(), &test_snapshot(), Some(date(2026, 3, 1))).unwrap();

        // climber 45 + groundsman 30, 4 hours = 300.00
        assert_eq!(result.labor.total, dec("300.00"));
        assert_eq!(result.equipment.total, dec("100.00"));
        assert_eq!(result.travel.total, dec("47.50"));
        assert_eq!(result.margins_applied.overhead_percent, dec("25.0"));
    }

    /// OR-002: a missing role fails the whole calculation
    #[test]
    fn test_unknown_role_aborts() {
        let mut input = test_input();
        input.crew.push(CrewMember {
            role: "crane_operator".to_string(),
            hourly_rate: Decimal::ZERO,
        });

        let result = calculate_estimate(&input, &test_snapshot(), Some(date(2026, 3, 1)));
        match result.unwrap_err() {
            EngineError::RateNotConfigured { key, .. } => assert_eq!(key, "crane_operator"),
            other => panic!("Expected RateNotConfigured, got {other:?}"),
        }
    }

    /// OR-003: historical dates resolve historical rates
    #[test]
    fn test_historical_date_uses_historical_rate() {
        let mut snapshot = test_snapshot();
        // retire the open climber rate and install versioned ones
        snapshot.labor_rates[0].lifecycle = Lifecycle::Retired;
        snapshot
            .add_labor_rate(LaborRate {
                role: "climber".to_string(),
                hourly_rate: dec("40.00"),
                window: EffectiveWindow::bounded(date(2024, 1, 1), date(2024, 12, 31)),
                lifecycle: Lifecycle::Active,
            })
            .unwrap();

        let mut input = test_input();
        input.crew.truncate(1); // climber only
        input.disposal_fee = Decimal::ZERO;
        input.permit_fee = Decimal::ZERO;
        input.equipment.clear();

        // equipment/vehicle/overhead need 2024 coverage too
        snapshot.equipment_rates[0].window = EffectiveWindow::open_from(date(2024, 1, 1));
        snapshot.vehicle_rates[0].window = EffectiveWindow::open_from(date(2024, 1, 1));
        snapshot.overhead_settings[0].window = EffectiveWindow::open_from(date(2024, 1, 1));

        let result =
            calculate_estimate(&input, &snapshot, Some(date(2024, 6, 1))).unwrap();
        assert_eq!(result.labor.total, dec("160.00"));
    }

    /// OR-004: large-job discount shifts overhead before the pipeline
    #[test]
    fn test_large_job_discount() {
        let mut snapshot = test_snapshot();
        snapshot.overhead_settings[0].large_job_threshold_hours = dec("8.0");
        snapshot.overhead_settings[0].large_job_discount_percent = dec("5.0");

        let mut input = test_input();
        input.hours = dec("10.0");

        let result = calculate_estimate(&input, &snapshot, Some(date(2026, 3, 1))).unwrap();
        assert_eq!(result.margins_applied.overhead_percent, dec("20.0"));
    }

    /// OR-005: small-job premium shifts overhead the other way
    #[test]
    fn test_small_job_premium() {
        let mut snapshot = test_snapshot();
        snapshot.overhead_settings[0].small_job_threshold_hours = dec("3.0");
        snapshot.overhead_settings[0].small_job_premium_percent = dec("7.5");

        let mut input = test_input();
        input.hours = dec("2.0");

        let result = calculate_estimate(&input, &snapshot, Some(date(2026, 3, 1))).unwrap();
        assert_eq!(result.margins_applied.overhead_percent, dec("32.5"));
    }

    /// OR-006: hours inside both thresholds leave overhead untouched
    #[test]
    fn test_thresholds_inert_in_band() {
        let mut snapshot = test_snapshot();
        snapshot.overhead_settings[0].large_job_threshold_hours = dec("8.0");
        snapshot.overhead_settings[0].large_job_discount_percent = dec("5.0");
        snapshot.overhead_settings[0].small_job_threshold_hours = dec("3.0");
        snapshot.overhead_settings[0].small_job_premium_percent = dec("7.5");

        let result =
            calculate_estimate(&test_input(), &snapshot, Some(date(2026, 3, 1))).unwrap();
        assert_eq!(result.margins_applied.overhead_percent, dec("25.0"));
    }

    /// OR-007: seasonal adjustment recomputes subtotal and re-rounds
    #[test]
    fn test_seasonal_adjustment_applied() {
        let mut snapshot = test_snapshot();
        snapshot.add_seasonal_rule(SeasonalAdjustmentRule {
            name: "storm_season".to_string(),
            season: SeasonWindow::new(12, 1, 2, 28),
            adjustment_percent: dec("15.0"),
            effective: EffectiveWindow::open_from(date(2025, 1, 1)),
            lifecycle: Lifecycle::Active,
        });

        let in_season =
            calculate_estimate(&test_input(), &snapshot, Some(date(2026, 1, 10))).unwrap();
        let off_season =
            calculate_estimate(&test_input(), &snapshot, Some(date(2026, 7, 1))).unwrap();

        let applied = in_season.seasonal_adjustment.as_ref().unwrap();
        assert_eq!(applied.name, "storm_season");
        assert_eq!(applied.percent, dec("15.0"));
        assert_eq!(
            in_season.subtotal,
            off_season.subtotal + applied.amount
        );
        assert_eq!(in_season.final_total % dec("5"), Decimal::ZERO);
        assert!(off_season.seasonal_adjustment.is_none());
        assert!(in_season.final_total > off_season.final_total);
    }

    /// OR-008: checksum verifies and covers the seasonal adjustment
    #[test]
    fn test_checksum_verifies_after_seasonal_adjustment() {
        let mut snapshot = test_snapshot();
        snapshot.add_seasonal_rule(SeasonalAdjustmentRule {
            name: "storm_season".to_string(),
            season: SeasonWindow::new(12, 1, 2, 28),
            adjustment_percent: dec("15.0"),
            effective: EffectiveWindow::open_from(date(2025, 1, 1)),
            lifecycle: Lifecycle::Active,
        });

        let result =
            calculate_estimate(&test_input(), &snapshot, Some(date(2026, 1, 10))).unwrap();
        assert!(result.verify_checksum());
    }

    /// OR-009: tampering with the stored total breaks verification
    #[test]
    fn test_tampered_total_fails_verification() {
        let mut result =
            calculate_estimate(&test_input(), &test_snapshot(), Some(date(2026, 3, 1))).unwrap();
        assert!(result.verify_checksum());

        result.final_total += dec("5");
        assert!(!result.verify_checksum());
    }

    /// OR-010: two runs differ only in id and timestamp
    #[test]
    fn test_repeat_runs_are_numerically_identical() {
        let input = test_input();
        let snapshot = test_snapshot();
        let on = Some(date(2026, 3, 1));

        let a = calculate_estimate(&input, &snapshot, on).unwrap();
        let b = calculate_estimate(&input, &snapshot, on).unwrap();

        assert_eq!(a.final_total, b.final_total);
        assert_eq!(a.subtotal, b.subtotal);
        assert_eq!(a.components, b.components);
        assert_eq!(a.checksum, b.checksum);
        assert_ne!(a.calculation_id, b.calculation_id);
    }

    #[test]
    fn test_invalid_input_rejected_before_resolution() {
        let mut input = test_input();
        input.hours = Decimal::ZERO;

        // an empty snapshot would also fail, but validation comes first
        let result = calculate_estimate(&input, &RateSnapshot::default(), Some(date(2026, 3, 1)));
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }
}
