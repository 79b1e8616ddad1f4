//! An immutable, explicitly passed view of the rate store.
//!
//! The engine never reads global state: the caller loads whatever records
//! back a calculation into a [`RateSnapshot`] and hands it to the
//! orchestrator. Resolution against the snapshot is read-only and safe for
//! unlimited parallel use. The `add_*` methods model the store's
//! single-writer-per-key critical section by running the overlap check
//! before accepting a record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::rates::record::{
    EquipmentRate, LaborRate, OverheadSettings, VehicleRate, Versioned,
};
use crate::rates::resolver::{check_overlap, resolve};
use crate::rates::seasonal::SeasonalAdjustmentRule;

/// All rate data needed to price one calculation.
///
/// # Example
///
/// ```
/// use estimate_engine::rates::{EffectiveWindow, LaborRate, Lifecycle, RateSnapshot};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let mut snapshot = RateSnapshot::default();
/// snapshot
///     .add_labor_rate(LaborRate {
///         role: "climber".to_string(),
///         hourly_rate: Decimal::from_str("45.00").unwrap(),
///         window: EffectiveWindow::open_from(
///             NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///         ),
///         lifecycle: Lifecycle::Active,
///     })
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Labor rates keyed by role.
    pub labor_rates: Vec<LaborRate>,
    /// Equipment rates keyed by equipment id.
    pub equipment_rates: Vec<EquipmentRate>,
    /// Vehicle rates keyed by vehicle type.
    pub vehicle_rates: Vec<VehicleRate>,
    /// Overhead settings keyed by setting name.
    pub overhead_settings: Vec<OverheadSettings>,
    /// Seasonal adjustment rules, in store iteration order.
    pub seasonal_rules: Vec<SeasonalAdjustmentRule>,
}

impl RateSnapshot {
    /// Adds a labor rate after checking the no-overlap invariant.
    pub fn add_labor_rate(&mut self, rate: LaborRate) -> EngineResult<()> {
        check_overlap(&self.labor_rates, rate.key(), rate.window(), None)?;
        self.labor_rates.push(rate);
        Ok(())
    }

    /// Adds an equipment rate after checking the no-overlap invariant.
    pub fn add_equipment_rate(&mut self, rate: EquipmentRate) -> EngineResult<()> {
        check_overlap(&self.equipment_rates, rate.key(), rate.window(), None)?;
        self.equipment_rates.push(rate);
        Ok(())
    }

    /// Adds a vehicle rate after checking the no-overlap invariant.
    pub fn add_vehicle_rate(&mut self, rate: VehicleRate) -> EngineResult<()> {
        check_overlap(&self.vehicle_rates, rate.key(), rate.window(), None)?;
        self.vehicle_rates.push(rate);
        Ok(())
    }

    /// Adds overhead settings after checking the no-overlap invariant.
    pub fn add_overhead_settings(&mut self, settings: OverheadSettings) -> EngineResult<()> {
        check_overlap(
            &self.overhead_settings,
            settings.key(),
            settings.window(),
            None,
        )?;
        self.overhead_settings.push(settings);
        Ok(())
    }

    /// Adds a seasonal adjustment rule.
    ///
    /// Seasonal rules recur yearly and are allowed to coexist; when more
    /// than one matches a date the orchestrator applies the first in
    /// insertion order.
    pub fn add_seasonal_rule(&mut self, rule: SeasonalAdjustmentRule) {
        self.seasonal_rules.push(rule);
    }

    /// Resolves the labor rate for `role` on `date`.
    pub fn labor_rate(&self, role: &str, date: NaiveDate) -> EngineResult<&LaborRate> {
        resolve(&self.labor_rates, role, date)
    }

    /// Resolves the equipment rate for `equipment_id` on `date`.
    pub fn equipment_rate(
        &self,
        equipment_id: &str,
        date: NaiveDate,
    ) -> EngineResult<&EquipmentRate> {
        resolve(&self.equipment_rates, equipment_id, date)
    }

    /// Resolves the vehicle rate for `vehicle_type` on `date`.
    pub fn vehicle_rate(&self, vehicle_type: &str, date: NaiveDate) -> EngineResult<&VehicleRate> {
        resolve(&self.vehicle_rates, vehicle_type, date)
    }

    /// Resolves the overhead settings named `setting_name` on `date`.
    pub fn overhead(&self, setting_name: &str, date: NaiveDate) -> EngineResult<&OverheadSettings> {
        resolve(&self.overhead_settings, setting_name, date)
    }

    /// Returns the first seasonal rule applying on `date`, if any.
    ///
    /// Rules are scanned in insertion order; the first match wins.
    pub fn first_seasonal_rule(&self, date: NaiveDate) -> Option<&SeasonalAdjustmentRule> {
        self.seasonal_rules.iter().find(|rule| rule.applies_on(date))
    }

    /// Re-checks the no-overlap invariant across the whole snapshot.
    ///
    /// Useful when a snapshot is deserialized from an external source
    /// rather than built through the `add_*` methods.
    pub fn validate(&self) -> EngineResult<()> {
        validate_records(&self.labor_rates)?;
        validate_records(&self.equipment_rates)?;
        validate_records(&self.vehicle_rates)?;
        validate_records(&self.overhead_settings)?;
        Ok(())
    }
}

fn validate_records<R: Versioned>(records: &[R]) -> EngineResult<()> {
    for (index, record) in records.iter().enumerate() {
        if record.lifecycle() == crate::rates::record::Lifecycle::Retired {
            continue;
        }
        // only scan forward; earlier pairs were already checked
        check_overlap(
            &records[index + 1..],
            record.key(),
            record.window(),
            None,
        )?;
    }
    Ok(())
}

/// A convenience builder for the common overhead settings shape.
///
/// Percent deltas default to zero so thresholds are inert unless set.
impl OverheadSettings {
    /// Creates settings with the given margins and no threshold
    /// adjustments.
    pub fn with_margins(
        setting_name: &str,
        overhead_percent: Decimal,
        profit_percent: Decimal,
        safety_buffer_percent: Decimal,
        window: crate::rates::record::EffectiveWindow,
    ) -> Self {
        Self {
            setting_name: setting_name.to_string(),
            overhead_percent,
            profit_percent,
            safety_buffer_percent,
            large_job_threshold_hours: Decimal::ZERO,
            large_job_discount_percent: Decimal::ZERO,
            small_job_threshold_hours: Decimal::ZERO,
            small_job_premium_percent: Decimal::ZERO,
            window,
            lifecycle: crate::rates::record::Lifecycle::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::rates::record::{EffectiveWindow, Lifecycle};
    use crate::rates::seasonal::SeasonWindow;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn climber(rate: &str, window: EffectiveWindow) -> LaborRate {
        LaborRate {
            role: "climber".to_string(),
            hourly_rate: dec(rate),
            window,
            lifecycle: Lifecycle::Active,
        }
    }

    #[test]
    fn test_add_labor_rate_rejects_overlap() {
        let mut snapshot = RateSnapshot::default();
        snapshot
            .add_labor_rate(climber("45.00", EffectiveWindow::open_from(date(2026, 1, 1))))
            .unwrap();

        let result = snapshot.add_labor_rate(climber(
            "48.00",
            EffectiveWindow::open_from(date(2026, 6, 1)),
        ));
        assert!(matches!(
            result,
            Err(EngineError::RateWindowConflict { .. })
        ));
        // the rejected record was not inserted
        assert_eq!(snapshot.labor_rates.len(), 1);
    }

    #[test]
    fn test_add_labor_rate_accepts_adjacent_windows() {
        let mut snapshot = RateSnapshot::default();
        snapshot
            .add_labor_rate(climber(
                "45.00",
                EffectiveWindow::bounded(date(2025, 1, 1), date(2025, 12, 31)),
            ))
            .unwrap();
        snapshot
            .add_labor_rate(climber("48.00", EffectiveWindow::open_from(date(2026, 1, 1))))
            .unwrap();

        assert_eq!(
            snapshot.labor_rate("climber", date(2025, 6, 1)).unwrap().hourly_rate,
            dec("45.00")
        );
        assert_eq!(
            snapshot.labor_rate("climber", date(2026, 6, 1)).unwrap().hourly_rate,
            dec("48.00")
        );
    }

    #[test]
    fn test_validate_catches_overlap_in_deserialized_snapshot() {
        // bypass add_* to simulate a snapshot arriving from outside
        let snapshot = RateSnapshot {
            labor_rates: vec![
                climber("45.00", EffectiveWindow::open_from(date(2026, 1, 1))),
                climber("48.00", EffectiveWindow::open_from(date(2026, 6, 1))),
            ],
            ..RateSnapshot::default()
        };

        assert!(matches!(
            snapshot.validate(),
            Err(EngineError::RateWindowConflict { .. })
        ));
    }

    #[test]
    fn test_validate_ignores_retired_records() {
        let mut retired = climber("45.00", EffectiveWindow::open_from(date(2026, 1, 1)));
        retired.lifecycle = Lifecycle::Retired;

        let snapshot = RateSnapshot {
            labor_rates: vec![
                retired,
                climber("48.00", EffectiveWindow::open_from(date(2026, 6, 1))),
            ],
            ..RateSnapshot::default()
        };

        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_first_seasonal_rule_uses_insertion_order() {
        let mut snapshot = RateSnapshot::default();
        snapshot.add_seasonal_rule(SeasonalAdjustmentRule {
            name: "storm_season".to_string(),
            season: SeasonWindow::new(12, 1, 2, 28),
            adjustment_percent: dec("15.0"),
            effective: EffectiveWindow::open_from(date(2025, 1, 1)),
            lifecycle: Lifecycle::Active,
        });
        snapshot.add_seasonal_rule(SeasonalAdjustmentRule {
            name: "winter_surcharge".to_string(),
            season: SeasonWindow::new(11, 1, 3, 31),
            adjustment_percent: dec("10.0"),
            effective: EffectiveWindow::open_from(date(2025, 1, 1)),
            lifecycle: Lifecycle::Active,
        });

        let rule = snapshot.first_seasonal_rule(date(2025, 12, 15)).unwrap();
        assert_eq!(rule.name, "storm_season");

        // only the second rule covers November
        let rule = snapshot.first_seasonal_rule(date(2025, 11, 15)).unwrap();
        assert_eq!(rule.name, "winter_surcharge");

        assert!(snapshot.first_seasonal_rule(date(2025, 7, 1)).is_none());
    }
}
