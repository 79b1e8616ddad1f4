//! Recurring seasonal adjustment rules and window matching.
//!
//! A seasonal window is a recurring (month, day) range that may wrap the
//! year boundary, e.g. storm season running December 1 through February 28.
//! Membership is decided by lexicographic (month, day) tuple comparison —
//! no calendar arithmetic — so day values 1–31 are accepted as given
//! without per-month validity checks. A boundary like February 30 simply
//! never matches.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rates::record::{EffectiveWindow, Lifecycle};

/// A recurring calendar window defined by start and end (month, day).
///
/// # Example
///
/// ```
/// use estimate_engine::rates::SeasonWindow;
///
/// // storm season wraps the year boundary
/// let winter = SeasonWindow::new(12, 1, 2, 28);
/// assert!(winter.contains(12, 15));
/// assert!(winter.contains(1, 10));
/// assert!(!winter.contains(7, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWindow {
    /// Start month, 1–12.
    pub start_month: u32,
    /// Start day, 1–31.
    pub start_day: u32,
    /// End month, 1–12.
    pub end_month: u32,
    /// End day, 1–31.
    pub end_day: u32,
}

impl SeasonWindow {
    /// Creates a window from start and end (month, day) pairs.
    pub fn new(start_month: u32, start_day: u32, end_month: u32, end_day: u32) -> Self {
        Self {
            start_month,
            start_day,
            end_month,
            end_day,
        }
    }

    /// Returns true if the given (month, day) falls inside the window.
    ///
    /// When start > end the window wraps December into January and a date
    /// matches if it is on or after the start or on or before the end.
    pub fn contains(&self, month: u32, day: u32) -> bool {
        let date = (month, day);
        let start = (self.start_month, self.start_day);
        let end = (self.end_month, self.end_day);

        if start <= end {
            start <= date && date <= end
        } else {
            date >= start || date <= end
        }
    }
}

/// A recurring seasonal percentage adjustment.
///
/// The rule carries two windows: the recurring [`SeasonWindow`] it matches
/// every year, and an [`EffectiveWindow`] governing when the rule itself
/// is in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalAdjustmentRule {
    /// The season name, e.g. "storm_season".
    pub name: String,
    /// The recurring calendar window.
    pub season: SeasonWindow,
    /// Percentage applied to the pre-rounding subtotal, e.g. 15.0 for +15%.
    pub adjustment_percent: Decimal,
    /// When the rule itself is active.
    pub effective: EffectiveWindow,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
}

impl SeasonalAdjustmentRule {
    /// Returns true if this rule applies on `date`.
    ///
    /// The rule must be active, its own effective window must contain the
    /// date, and the date's (month, day) must fall inside the season.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.lifecycle == Lifecycle::Active
            && self.effective.contains(date)
            && self.season.contains(date.month(), date.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn storm_season_rule() -> SeasonalAdjustmentRule {
        SeasonalAdjustmentRule {
            name: "storm_season".to_string(),
            season: SeasonWindow::new(12, 1, 2, 28),
            adjustment_percent: Decimal::from_str("15.0").unwrap(),
            effective: EffectiveWindow::open_from(date(2025, 1, 1)),
            lifecycle: Lifecycle::Active,
        }
    }

    /// SW-001: non-wrapping window is a plain inclusive range
    #[test]
    fn test_same_year_window_inclusive_bounds() {
        let summer = SeasonWindow::new(6, 1, 8, 31);
        assert!(summer.contains(6, 1));
        assert!(summer.contains(7, 15));
        assert!(summer.contains(8, 31));
        assert!(!summer.contains(5, 31));
        assert!(!summer.contains(9, 1));
    }

    /// SW-002: wraparound window matches both sides of New Year
    #[test]
    fn test_wraparound_window_matches_both_sides() {
        let winter = SeasonWindow::new(12, 1, 2, 28);
        assert!(winter.contains(12, 15));
        assert!(winter.contains(1, 10));
        assert!(winter.contains(12, 1));
        assert!(winter.contains(2, 28));
        assert!(!winter.contains(7, 1));
        assert!(!winter.contains(11, 30));
        assert!(!winter.contains(3, 1));
    }

    /// SW-003: day values are taken as given, no calendar validation
    #[test]
    fn test_impossible_boundary_day_is_accepted_lenient() {
        // Feb 30 as an end boundary is accepted; real dates up to Feb 29
        // still compare correctly against it
        let window = SeasonWindow::new(12, 1, 2, 30);
        assert!(window.contains(2, 28));
        assert!(window.contains(2, 29));
        assert!(!window.contains(3, 1));
    }

    #[test]
    fn test_single_day_window() {
        let window = SeasonWindow::new(7, 4, 7, 4);
        assert!(window.contains(7, 4));
        assert!(!window.contains(7, 3));
        assert!(!window.contains(7, 5));
    }

    #[test]
    fn test_rule_applies_only_inside_season() {
        let rule = storm_season_rule();
        assert!(rule.applies_on(date(2025, 12, 15)));
        assert!(rule.applies_on(date(2026, 1, 10)));
        assert!(!rule.applies_on(date(2026, 7, 1)));
    }

    #[test]
    fn test_rule_respects_its_own_effective_window() {
        let mut rule = storm_season_rule();
        rule.effective = EffectiveWindow::bounded(date(2025, 1, 1), date(2025, 12, 31));

        // in season but the rule itself has lapsed
        assert!(rule.applies_on(date(2025, 12, 15)));
        assert!(!rule.applies_on(date(2026, 1, 10)));
    }

    #[test]
    fn test_retired_rule_never_applies() {
        let mut rule = storm_season_rule();
        rule.lifecycle = Lifecycle::Retired;
        assert!(!rule.applies_on(date(2025, 12, 15)));
    }
}
