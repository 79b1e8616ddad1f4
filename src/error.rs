//! Error types for the estimate pricing engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all failure conditions that can occur during rate resolution and
//! estimate calculation.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the pricing engine.
///
/// Every fallible operation in the engine returns this error type. All
/// calculation-time errors are terminal for the invocation: the engine
/// never produces a partial price and never retries internally.
///
/// # Example
///
/// ```
/// use estimate_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::RateNotConfigured {
///     key: "climber".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "No rate configured for 'climber' on 2026-03-01"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A calculation input failed validation before any pricing ran.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The input field that was rejected.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No rate record covers the requested key on the requested date.
    ///
    /// The calculation aborts entirely; no default rate is substituted.
    #[error("No rate configured for '{key}' on {date}")]
    RateNotConfigured {
        /// The role, equipment id, vehicle type, or setting name.
        key: String,
        /// The date for which a rate was requested.
        date: NaiveDate,
    },

    /// More than one rate record covers the same key and date.
    ///
    /// This means overlapping effective windows slipped past write-time
    /// validation. It is a data-integrity fault, not a normal miss, and
    /// is never resolved by silently picking one of the candidates.
    #[error("{matches} rate records overlap for '{key}' on {date}")]
    AmbiguousRate {
        /// The key whose records overlap.
        key: String,
        /// The date on which multiple windows matched.
        date: NaiveDate,
        /// How many records matched.
        matches: usize,
    },

    /// A new or edited rate window intersects an existing window.
    ///
    /// Raised by the write-side overlap check, never during calculation.
    #[error("Rate window for '{key}' ({from} to {end}) overlaps an existing record", end = display_window_end(.to))]
    RateWindowConflict {
        /// The key the conflicting write targeted.
        key: String,
        /// Start of the rejected window.
        from: NaiveDate,
        /// End of the rejected window, `None` for open-ended.
        to: Option<NaiveDate>,
    },

    /// An attempt to modify a rate window that has already taken effect.
    ///
    /// Once `effective_from` is on or before today, the record is
    /// immutable; only never-yet-effective windows may be rescheduled.
    #[error("Rate for '{key}' took effect on {effective_from} and can no longer be modified")]
    ImmutableWindowEdit {
        /// The key of the record being edited.
        key: String,
        /// The start of the window that has already begun.
        effective_from: NaiveDate,
    },
}

fn display_window_end(to: &Option<NaiveDate>) -> String {
    match to {
        Some(date) => date.to_string(),
        None => "open".to_string(),
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::InvalidInput {
            field: "hours".to_string(),
            message: "must be greater than zero".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid input field 'hours': must be greater than zero"
        );
    }

    #[test]
    fn test_rate_not_configured_displays_key_and_date() {
        let error = EngineError::RateNotConfigured {
            key: "chipper".to_string(),
            date: date(2026, 1, 15),
        };
        assert_eq!(
            error.to_string(),
            "No rate configured for 'chipper' on 2026-01-15"
        );
    }

    #[test]
    fn test_ambiguous_rate_displays_match_count() {
        let error = EngineError::AmbiguousRate {
            key: "climber".to_string(),
            date: date(2026, 1, 15),
            matches: 2,
        };
        assert_eq!(
            error.to_string(),
            "2 rate records overlap for 'climber' on 2026-01-15"
        );
    }

    #[test]
    fn test_window_conflict_renders_open_end() {
        let error = EngineError::RateWindowConflict {
            key: "groundsman".to_string(),
            from: date(2026, 1, 1),
            to: None,
        };
        assert!(error.to_string().contains("2026-01-01 to open"));
    }

    #[test]
    fn test_window_conflict_renders_closed_end() {
        let error = EngineError::RateWindowConflict {
            key: "groundsman".to_string(),
            from: date(2026, 1, 1),
            to: Some(date(2026, 6, 30)),
        };
        assert!(error.to_string().contains("2026-01-01 to 2026-06-30"));
    }

    #[test]
    fn test_immutable_window_edit_displays_start() {
        let error = EngineError::ImmutableWindowEdit {
            key: "standard".to_string(),
            effective_from: date(2025, 7, 1),
        };
        assert_eq!(
            error.to_string(),
            "Rate for 'standard' took effect on 2025-07-01 and can no longer be modified"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_configured() -> EngineResult<()> {
            Err(EngineError::RateNotConfigured {
                key: "climber".to_string(),
                date: date(2026, 1, 1),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_configured()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
