//! Effective-dated rate resolution and write-side window guards.
//!
//! The read path ([`resolve`]) is the only lookup the calculation pipeline
//! uses: it selects the single active record whose window contains the
//! target date. The write-side guards ([`check_overlap`],
//! [`ensure_editable`]) are run by the persistence collaborator before
//! accepting a new or edited record; the resolver itself never mutates
//! anything.

use chrono::NaiveDate;
use tracing::error;

use crate::error::{EngineError, EngineResult};
use crate::rates::record::{EffectiveWindow, Versioned};

/// Selects the record for `key` whose window contains `on_date`.
///
/// Exactly one record must match when the no-overlap invariant holds.
///
/// # Errors
///
/// * [`EngineError::RateNotConfigured`] — no active record covers the
///   date. The caller must abort the whole calculation; no fallback rate
///   is ever substituted.
/// * [`EngineError::AmbiguousRate`] — more than one record matched. This
///   means overlapping windows reached the store, a data-integrity fault
///   that is logged loudly and never resolved by picking a candidate.
pub fn resolve<'a, R: Versioned>(
    records: &'a [R],
    key: &str,
    on_date: NaiveDate,
) -> EngineResult<&'a R> {
    let mut matched: Option<&R> = None;
    let mut match_count = 0usize;

    for record in records {
        if record.key() == key && record.in_effect_on(on_date) {
            match_count += 1;
            if matched.is_none() {
                matched = Some(record);
            }
        }
    }

    match (matched, match_count) {
        (None, _) => Err(EngineError::RateNotConfigured {
            key: key.to_string(),
            date: on_date,
        }),
        (Some(record), 1) => Ok(record),
        (Some(_), matches) => {
            error!(
                key,
                date = %on_date,
                matches,
                "overlapping rate windows detected in store; refusing to resolve"
            );
            Err(EngineError::AmbiguousRate {
                key: key.to_string(),
                date: on_date,
                matches,
            })
        }
    }
}

/// Checks a proposed window against existing records for the same key.
///
/// Retired records are ignored. `exclude_index` lets an edit skip the
/// record being edited so it does not conflict with itself.
///
/// # Errors
///
/// Returns [`EngineError::RateWindowConflict`] if any non-retired record
/// for `key` intersects `window` (open ends extend to +infinity).
pub fn check_overlap<R: Versioned>(
    records: &[R],
    key: &str,
    window: &EffectiveWindow,
    exclude_index: Option<usize>,
) -> EngineResult<()> {
    for (index, record) in records.iter().enumerate() {
        if Some(index) == exclude_index {
            continue;
        }
        if record.key() != key {
            continue;
        }
        if record.lifecycle() == crate::rates::record::Lifecycle::Retired {
            continue;
        }
        if record.window().overlaps(window) {
            return Err(EngineError::RateWindowConflict {
                key: key.to_string(),
                from: window.from,
                to: window.to,
            });
        }
    }
    Ok(())
}

/// Rejects edits to a window that has already taken effect.
///
/// # Errors
///
/// Returns [`EngineError::ImmutableWindowEdit`] when the record's
/// `effective_from` is on or before `today`. Only never-yet-effective
/// future windows may be edited or rescheduled.
pub fn ensure_editable<R: Versioned>(record: &R, today: NaiveDate) -> EngineResult<()> {
    if record.window().has_begun(today) {
        return Err(EngineError::ImmutableWindowEdit {
            key: record.key().to_string(),
            effective_from: record.window().from,
        });
    }
    Ok(())
}
