//! Frequency feasibility gate.
//!
//! A covenant whose period cannot fit inside the transaction has no due
//! obligation during its life. Such covenants are skipped, not rejected.

use crate::models::Frequency;

/// Minimum transaction length for an annual covenant.
pub const MIN_ANNUAL_DAYS: i64 = 365;
/// Minimum transaction length for a quarterly covenant.
pub const MIN_QUARTERLY_DAYS: i64 = 90;
/// Minimum transaction length for a monthly covenant.
pub const MIN_MONTHLY_DAYS: i64 = 28;

/// Minimum `end - start` in days for `frequency`, if it is gated at all.
pub fn minimum_duration_days(frequency: Frequency) -> Option<i64> {
    match frequency {
        Frequency::Annually => Some(MIN_ANNUAL_DAYS),
        Frequency::Quarterly => Some(MIN_QUARTERLY_DAYS),
        Frequency::Monthly => Some(MIN_MONTHLY_DAYS),
        Frequency::Daily | Frequency::Weekly => None,
    }
}

/// Returns true when a covenant of `frequency` can fall due within a
/// transaction lasting `duration_days`.
///
/// # Example
///
/// ```
/// use covenant_schedule::models::Frequency;
/// use covenant_schedule::schedule::is_feasible;
///
/// assert!(!is_feasible(Frequency::Monthly, 1));
/// assert!(is_feasible(Frequency::Monthly, 28));
/// assert!(is_feasible(Frequency::Daily, 0));
/// ```
pub fn is_feasible(frequency: Frequency, duration_days: i64) -> bool {
    minimum_duration_days(frequency).is_none_or(|minimum| duration_days >= minimum)
}
