//! Error types for the covenant schedule engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every configuration and validation failure the generator can report.
//! Persistence failures live in [`crate::store::StoreError`].

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for schedule generation.
///
/// Configuration errors and validation errors share this type so that a
/// caller sees a single typed failure naming the offending field or value.
///
/// # Example
///
/// ```
/// use covenant_schedule::error::ScheduleError;
///
/// let error = ScheduleError::DuplicateCovenant {
///     covenant_id: "COV-001".to_string(),
/// };
/// assert_eq!(error.to_string(), "Duplicate covenant_id found: COV-001");
/// ```
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The business-day adjustment direction was not `forward` or `backward`.
    #[error("business_day_adjustment must be 'forward' or 'backward', got '{value}'")]
    InvalidAdjustment {
        /// The rejected value.
        value: String,
    },

    /// No business day was found within the bounded adjustment search.
    #[error("Unable to find a business day within {steps} days of {date}")]
    BusinessDayNotFound {
        /// The date the search started from.
        date: NaiveDate,
        /// The number of days searched.
        steps: u32,
    },

    /// Date arithmetic ran past the representable calendar range.
    #[error("Date arithmetic overflowed from {date}")]
    DateOutOfRange {
        /// The date the arithmetic started from.
        date: NaiveDate,
    },

    /// A transaction field was missing or malformed.
    #[error("Invalid transaction field '{field}': {message}")]
    InvalidTransaction {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A covenant field was missing or malformed.
    #[error("Invalid covenant '{covenant_id}' field '{field}': {message}")]
    InvalidCovenant {
        /// The covenant identifier, or empty when the identifier itself is missing.
        covenant_id: String,
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A covenant referenced a different transaction than the one being generated.
    #[error("Covenant {covenant_id} transaction_id '{actual}' does not match transaction '{expected}'")]
    TransactionMismatch {
        /// The covenant identifier.
        covenant_id: String,
        /// The transaction being generated.
        expected: String,
        /// The transaction the covenant referenced.
        actual: String,
    },

    /// Two covenants in one batch shared an identifier.
    #[error("Duplicate covenant_id found: {covenant_id}")]
    DuplicateCovenant {
        /// The repeated identifier.
        covenant_id: String,
    },

    /// A frequency had no registered generator.
    #[error("Unsupported frequency: {frequency}")]
    UnsupportedFrequency {
        /// The frequency that could not be dispatched.
        frequency: String,
    },

    /// A holiday calendar could not be produced for a country.
    #[error("Holiday calendar unavailable for '{country}': {message}")]
    HolidayCalendar {
        /// The requested country code.
        country: String,
        /// A description of the failure.
        message: String,
    },
}

impl ScheduleError {
    /// Returns true for errors caused by the generator's configuration rather
    /// than by the transaction or covenants it was given.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ScheduleError::ConfigNotFound { .. }
                | ScheduleError::ConfigParseError { .. }
                | ScheduleError::InvalidAdjustment { .. }
                | ScheduleError::BusinessDayNotFound { .. }
                | ScheduleError::DateOutOfRange { .. }
                | ScheduleError::UnsupportedFrequency { .. }
                | ScheduleError::HolidayCalendar { .. }
        )
    }
}

/// A type alias for Results that return ScheduleError.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
