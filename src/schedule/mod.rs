//! Schedule generation.
//!
//! [`ScheduleGenerator`] validates a transaction and its covenants, drops
//! covenants that cannot fall due within the transaction, and dispatches the
//! rest to a per-frequency generator:
//!
//! - daily: one entry per business day, due the next business day
//! - weekly: seven-day windows, due the day after each window
//! - monthly, quarterly, annually: calendar-month periods anchored on the
//!   transaction start date

mod daily;
mod feasibility;
mod generator;
mod periodic;
mod validation;
mod weekly;

pub use daily::generate_daily;
pub use feasibility::{
    MIN_ANNUAL_DAYS, MIN_MONTHLY_DAYS, MIN_QUARTERLY_DAYS, is_feasible, minimum_duration_days,
};
pub use generator::ScheduleGenerator;
pub use periodic::{generate_annually, generate_monthly, generate_periodic, generate_quarterly};
pub use validation::{check_membership, validate_batch};
pub use weekly::generate_weekly;
