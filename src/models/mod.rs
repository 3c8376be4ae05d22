//! Core data models for the covenant schedule engine.
//!
//! This module contains the domain types shared by the generator, the
//! persistence gateway and the HTTP API.

mod covenant;
mod schedule;
mod transaction;

pub use covenant::{Covenant, CovenantInput, Frequency, is_valid_email};
pub use schedule::{InvalidStatus, ScheduleEntry, ScheduleStatus, schedule_id};
pub use transaction::{Transaction, TransactionInput};

/// The single date format used on every boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
