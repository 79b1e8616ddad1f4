//! Effective-dated rate records.
//!
//! Every rate the engine consumes — labor, equipment, vehicle, and overhead
//! settings — follows the same structural pattern: an identifier key, one or
//! more decimal rate fields, an inclusive effective window, and a lifecycle
//! state. The [`Versioned`] trait captures that pattern so resolution and
//! overlap checking are written once.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a rate record.
///
/// Retirement is an explicit tagged state rather than a nullable deletion
/// timestamp, so resolution logic cannot accidentally treat a retired
/// record as live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// The record participates in rate resolution.
    Active,
    /// The record is logically deleted and never resolves.
    Retired,
}

/// An inclusive validity window for a rate record.
///
/// `to: None` means the window is open-ended and extends indefinitely.
///
/// # Example
///
/// ```
/// use estimate_engine::rates::EffectiveWindow;
/// use chrono::NaiveDate;
///
/// let window = EffectiveWindow {
///     from: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     to: None,
/// };
/// assert!(window.contains(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()));
/// assert!(!window.contains(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveWindow {
    /// First date (inclusive) on which the record applies.
    pub from: NaiveDate,
    /// Last date (inclusive) on which the record applies; `None` = open.
    pub to: Option<NaiveDate>,
}

impl EffectiveWindow {
    /// Creates a window covering `from` onwards with no end date.
    pub fn open_from(from: NaiveDate) -> Self {
        Self { from, to: None }
    }

    /// Creates a bounded window covering `from` through `to`, inclusive.
    pub fn bounded(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to: Some(to) }
    }

    /// Returns true if `date` falls inside this window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.from {
            return false;
        }
        match self.to {
            Some(to) => date <= to,
            None => true,
        }
    }

    /// Returns true if this window intersects `other`.
    ///
    /// An open end counts as extending to +infinity, so two open-ended
    /// windows for the same key always conflict.
    pub fn overlaps(&self, other: &EffectiveWindow) -> bool {
        let self_ends_before = match self.to {
            Some(to) => to < other.from,
            None => false,
        };
        let other_ends_before = match other.to {
            Some(to) => to < self.from,
            None => false,
        };
        !(self_ends_before || other_ends_before)
    }

    /// Returns true if the window has already taken effect as of `today`.
    ///
    /// A begun window is immutable on the write path.
    pub fn has_begun(&self, today: NaiveDate) -> bool {
        self.from <= today
    }
}

/// Common shape shared by every effective-dated rate record.
///
/// Implementors expose their identifier key, validity window, and lifecycle
/// so [`crate::rates::resolve`] and [`crate::rates::check_overlap`] work
/// across all record kinds.
pub trait Versioned {
    /// The identifier this record prices (role, equipment id, vehicle
    /// type, or setting name).
    fn key(&self) -> &str;

    /// The record's validity window.
    fn window(&self) -> &EffectiveWindow;

    /// The record's lifecycle state.
    fn lifecycle(&self) -> Lifecycle;

    /// Convenience: true if the record is active and its window contains
    /// `date`.
    fn in_effect_on(&self, date: NaiveDate) -> bool {
        self.lifecycle() == Lifecycle::Active && self.window().contains(date)
    }
}

/// Hourly labor rate for a crew role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborRate {
    /// The crew role this rate prices, e.g. "climber" or "groundsman".
    pub role: String,
    /// Hourly rate in dollars.
    pub hourly_rate: Decimal,
    /// Validity window.
    pub window: EffectiveWindow,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
}

impl Versioned for LaborRate {
    fn key(&self) -> &str {
        &self.role
    }

    fn window(&self) -> &EffectiveWindow {
        &self.window
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

/// Hourly cost for a piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRate {
    /// The equipment identifier, e.g. "chipper_12in".
    pub equipment_id: String,
    /// Hourly rate in dollars.
    pub hourly_rate: Decimal,
    /// Validity window.
    pub window: EffectiveWindow,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
}

impl Versioned for EquipmentRate {
    fn key(&self) -> &str {
        &self.equipment_id
    }

    fn window(&self) -> &EffectiveWindow {
        &self.window
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

/// Per-mile and driver rates for a vehicle type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRate {
    /// The vehicle type, e.g. "chipper_truck".
    pub vehicle_type: String,
    /// Cost per mile driven.
    pub rate_per_mile: Decimal,
    /// Hourly rate for the driver's travel time.
    pub driver_hourly_rate: Decimal,
    /// Validity window.
    pub window: EffectiveWindow,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
}

impl Versioned for VehicleRate {
    fn key(&self) -> &str {
        &self.vehicle_type
    }

    fn window(&self) -> &EffectiveWindow {
        &self.window
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

/// Overhead and margin settings, effective-dated like any other rate.
///
/// The threshold fields shift the overhead percentage before the pipeline
/// runs: jobs longer than `large_job_threshold_hours` earn a discount,
/// jobs shorter than `small_job_threshold_hours` pay a premium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverheadSettings {
    /// The settings scenario name, e.g. "standard" or "commercial".
    pub setting_name: String,
    /// Base overhead percentage, e.g. 25.0 for 25%.
    pub overhead_percent: Decimal,
    /// Profit margin percentage.
    pub profit_percent: Decimal,
    /// Safety buffer percentage.
    pub safety_buffer_percent: Decimal,
    /// Hours above which the large-job discount applies.
    pub large_job_threshold_hours: Decimal,
    /// Percentage points subtracted from overhead for large jobs.
    pub large_job_discount_percent: Decimal,
    /// Hours below which the small-job premium applies.
    pub small_job_threshold_hours: Decimal,
    /// Percentage points added to overhead for small jobs.
    pub small_job_premium_percent: Decimal,
    /// Validity window.
    pub window: EffectiveWindow,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
}

impl Versioned for OverheadSettings {
    fn key(&self) -> &str {
        &self.setting_name
    }

    fn window(&self) -> &EffectiveWindow {
        &self.window
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}
