//! Response types for the covenant schedule API.
//!
//! This module defines the success bodies, the error body shared by every
//! endpoint, and the mapping from domain errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::{InvalidStatus, ScheduleEntry, ScheduleStatus};
use crate::store::StoreError;

/// Body returned by the schedule generation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The transaction the schedules belong to.
    pub transaction_id: String,
    /// Number of entries in `schedules`.
    pub schedule_count: usize,
    /// Generated entries in covenant order.
    pub schedules: Vec<ScheduleEntry>,
}

impl GenerateResponse {
    /// Wraps generated entries for `transaction_id`.
    pub fn new(transaction_id: impl Into<String>, schedules: Vec<ScheduleEntry>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            schedule_count: schedules.len(),
            schedules,
        }
    }
}

/// Body returned after a status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    /// The updated schedule.
    pub schedule_id: String,
    /// Its new status.
    pub status: ScheduleStatus,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a transaction not found error response.
    pub fn transaction_not_found(transaction_id: &str) -> Self {
        Self::new(
            "TRANSACTION_NOT_FOUND",
            format!("Transaction not found: {}", transaction_id),
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ScheduleError> for ApiErrorResponse {
    fn from(error: ScheduleError) -> Self {
        let message = error.to_string();
        match error {
            ScheduleError::InvalidTransaction { field, .. } => Self::bad_request(
                ApiError::with_details("INVALID_TRANSACTION", message, field),
            ),
            ScheduleError::InvalidCovenant { field, .. } => {
                Self::bad_request(ApiError::with_details("INVALID_COVENANT", message, field))
            }
            ScheduleError::TransactionMismatch { covenant_id, .. } => Self::bad_request(
                ApiError::with_details("TRANSACTION_MISMATCH", message, covenant_id),
            ),
            ScheduleError::DuplicateCovenant { covenant_id } => Self::bad_request(
                ApiError::with_details("DUPLICATE_COVENANT", message, covenant_id),
            ),
            ScheduleError::DateOutOfRange { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("DATE_OUT_OF_RANGE", message),
            ),
            ScheduleError::BusinessDayNotFound { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "BUSINESS_DAY_NOT_FOUND",
                    message,
                    "The holiday calendar leaves no business day near this date",
                ),
            ),
            other if other.is_configuration() => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            _ => Self::bad_request(ApiError::new("INVALID_REQUEST", message)),
        }
    }
}

impl From<StoreError> for ApiErrorResponse {
    fn from(error: StoreError) -> Self {
        let message = error.to_string();
        match error {
            StoreError::Validation(inner) => inner.into(),
            StoreError::DuplicateTransaction { .. }
            | StoreError::DuplicateCovenant { .. }
            | StoreError::DuplicateScheduleInBatch { .. }
            | StoreError::DuplicateSchedule { .. } => {
                Self::new(StatusCode::CONFLICT, ApiError::new("DUPLICATE_RECORD", message))
            }
            StoreError::UnknownTransaction { .. } | StoreError::UnknownCovenant { .. } => {
                Self::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ApiError::new("REFERENTIAL_ERROR", message),
                )
            }
            StoreError::DueDateOnHoliday { .. } | StoreError::DueDateOnWeekend { .. } => {
                Self::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ApiError::new("NON_BUSINESS_DUE_DATE", message),
                )
            }
            StoreError::ScheduleNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("SCHEDULE_NOT_FOUND", message),
            ),
            StoreError::UnsupportedSchemaVersion { .. }
            | StoreError::InvalidData(_)
            | StoreError::Sqlite(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORAGE_ERROR", "Storage error", message),
            ),
        }
    }
}

impl From<InvalidStatus> for ApiErrorResponse {
    fn from(error: InvalidStatus) -> Self {
        Self::bad_request(ApiError::with_details(
            "INVALID_STATUS",
            error.to_string(),
            "Status must be one of pending, completed, overdue, cancelled",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        let response: ApiErrorResponse = ScheduleError::InvalidCovenant {
            covenant_id: "COV-001".to_string(),
            field: "owner_email".to_string(),
            message: "invalid email".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_COVENANT");
        assert_eq!(response.error.details.as_deref(), Some("owner_email"));
    }

    #[test]
    fn test_store_conflicts_and_not_found() {
        let conflict: ApiErrorResponse = StoreError::DuplicateTransaction {
            transaction_id: "TXN-001".to_string(),
        }
        .into();
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let missing: ApiErrorResponse = StoreError::ScheduleNotFound {
            schedule_id: "SCH-COV-001-001".to_string(),
        }
        .into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_wrapped_validation_error_keeps_its_status() {
        let response: ApiErrorResponse = StoreError::Validation(ScheduleError::InvalidTransaction {
            field: "transaction_id".to_string(),
            message: "must not be blank".to_string(),
        })
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_TRANSACTION");
    }

    #[test]
    fn test_configuration_errors_are_internal() {
        let response: ApiErrorResponse = ScheduleError::BusinessDayNotFound {
            date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            steps: 10,
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_adjustment_maps_to_config_error() {
        let response: ApiErrorResponse = ScheduleError::InvalidAdjustment {
            value: "sideways".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "CONFIG_ERROR");
        assert!(response.error.details.unwrap().contains("sideways"));
    }
}
