//! Persistence for transactions, covenants and generated schedules.
//!
//! The generator never touches storage. Callers decide what to persist and
//! hand it to a [`ScheduleStore`], which re-checks referential integrity,
//! uniqueness and the business-day rule on due dates independently of the
//! generator.

mod migrations;
mod sqlite;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::error::ScheduleError;
use crate::models::{Covenant, ScheduleEntry, ScheduleStatus, Transaction};

pub use migrations::{apply_migrations, current_version, latest_version};
pub use sqlite::SqliteScheduleStore;

/// Errors raised by a [`ScheduleStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A transaction with this id is already stored.
    #[error("Duplicate transaction_id found: {transaction_id}")]
    DuplicateTransaction {
        /// The repeated id.
        transaction_id: String,
    },

    /// A covenant points at a transaction that is not stored.
    #[error("Covenant {covenant_id} references non-existent transaction_id {transaction_id}")]
    UnknownTransaction {
        /// The offending covenant.
        covenant_id: String,
        /// The missing transaction.
        transaction_id: String,
    },

    /// A covenant with this id is already stored or repeats in the batch.
    #[error("Duplicate covenant_id found: {covenant_id}")]
    DuplicateCovenant {
        /// The repeated id.
        covenant_id: String,
    },

    /// A schedule id repeats inside one batch.
    #[error("Duplicate schedule_id in batch: {schedule_id}")]
    DuplicateScheduleInBatch {
        /// The repeated id.
        schedule_id: String,
    },

    /// A schedule with this id is already stored.
    #[error("Duplicate schedule_id found: {schedule_id}")]
    DuplicateSchedule {
        /// The repeated id.
        schedule_id: String,
    },

    /// A schedule points at a covenant that is not stored.
    #[error("Schedule {schedule_id} references non-existent covenant_id {covenant_id}")]
    UnknownCovenant {
        /// The offending schedule.
        schedule_id: String,
        /// The missing covenant.
        covenant_id: String,
    },

    /// A due date falls on a supplied holiday.
    #[error("Schedule {schedule_id} due_date {due_date} falls on a holiday")]
    DueDateOnHoliday {
        /// The offending schedule.
        schedule_id: String,
        /// Its due date.
        due_date: NaiveDate,
    },

    /// A due date falls on a Saturday or Sunday.
    #[error("Schedule {schedule_id} due_date {due_date} falls on a weekend")]
    DueDateOnWeekend {
        /// The offending schedule.
        schedule_id: String,
        /// Its due date.
        due_date: NaiveDate,
    },

    /// No schedule with this id is stored.
    #[error("Schedule not found: {schedule_id}")]
    ScheduleNotFound {
        /// The requested id.
        schedule_id: String,
    },

    /// The database was written by a newer schema.
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        /// Version found in the file.
        db_version: u32,
        /// Latest version this build knows.
        latest_supported: u32,
    },

    /// A stored row could not be decoded.
    #[error("invalid persisted data: {0}")]
    InvalidData(String),

    /// The record failed model validation before being written.
    #[error(transparent)]
    Validation(#[from] ScheduleError),

    /// SQLite failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Returns true when the error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::ScheduleNotFound { .. })
    }

    /// Returns true when the error reports a clash with stored data.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateTransaction { .. }
                | StoreError::DuplicateCovenant { .. }
                | StoreError::DuplicateScheduleInBatch { .. }
                | StoreError::DuplicateSchedule { .. }
        )
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage contract for generated schedules and their parents.
///
/// Batch writes are all-or-nothing: a rejected record leaves the store as it
/// was before the call.
pub trait ScheduleStore {
    /// Stores a transaction, rejecting a duplicate id.
    fn save_transaction(&mut self, transaction: &Transaction) -> StoreResult<()>;

    /// Stores covenants whose transactions already exist.
    fn save_covenants(&mut self, covenants: &[Covenant]) -> StoreResult<()>;

    /// Stores schedule entries after re-checking ids, parents and due dates.
    ///
    /// Due dates must not fall on a weekend or on one of `holidays`.
    fn save_schedules(
        &mut self,
        entries: &[ScheduleEntry],
        holidays: Option<&BTreeSet<NaiveDate>>,
    ) -> StoreResult<()>;

    /// Stores a transaction, its covenants and their schedules atomically.
    fn save_generated(
        &mut self,
        transaction: &Transaction,
        covenants: &[Covenant],
        entries: &[ScheduleEntry],
        holidays: Option<&BTreeSet<NaiveDate>>,
    ) -> StoreResult<()>;

    /// Lists schedules in insertion order, optionally for one covenant.
    fn get_schedules(&self, covenant_id: Option<&str>) -> StoreResult<Vec<ScheduleEntry>>;

    /// Looks up one transaction.
    fn get_transaction(&self, transaction_id: &str) -> StoreResult<Option<Transaction>>;

    /// Lists covenants in insertion order, optionally for one transaction.
    fn get_covenants(&self, transaction_id: Option<&str>) -> StoreResult<Vec<Covenant>>;

    /// Moves a schedule to `status`.
    fn update_schedule_status(&mut self, schedule_id: &str, status: ScheduleStatus)
    -> StoreResult<()>;

    /// Removes a schedule.
    fn delete_schedule(&mut self, schedule_id: &str) -> StoreResult<()>;
}
