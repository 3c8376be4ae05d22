//! Request types for the covenant schedule API.
//!
//! Bodies deserialize into the loose `*Input` shapes so that a missing or
//! malformed field is reported by domain validation, naming the field.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleResult;
use crate::models::{Covenant, CovenantInput, Transaction, TransactionInput};
use crate::schedule::check_membership;

/// Request body for `POST /schedules/generate` and `POST /schedules`.
///
/// # Example JSON
///
/// ```json
/// {
///   "transaction": {
///     "transaction_id": "TXN-001",
///     "name": "Corporate Credit Facility",
///     "start_date": "2025-01-15",
///     "end_date": "2027-01-15"
///   },
///   "covenants": [
///     {
///       "covenant_id": "COV-001",
///       "transaction_id": "TXN-001",
///       "description": "Monthly Financial Statements",
///       "frequency": "monthly",
///       "owner_email": "finance@company.com"
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The transaction whose schedules are generated.
    pub transaction: TransactionInput,
    /// Covenants attached to the transaction.
    #[serde(default)]
    pub covenants: Vec<CovenantInput>,
}

impl GenerateRequest {
    /// Converts the request into validated domain types.
    ///
    /// Covenants are checked one at a time in input order, so the error
    /// names the first covenant that fails any check.
    pub fn into_domain(self) -> ScheduleResult<(Transaction, Vec<Covenant>)> {
        let transaction = Transaction::try_from(self.transaction)?;
        let mut seen_covenant_ids = HashSet::with_capacity(self.covenants.len());
        let mut covenants = Vec::with_capacity(self.covenants.len());
        for input in self.covenants {
            let covenant = Covenant::try_from(input)?;
            check_membership(&transaction, &covenant, &mut seen_covenant_ids)?;
            covenants.push(covenant);
        }
        Ok((transaction, covenants))
    }
}

/// Request body for `PATCH /schedules/:schedule_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// New status: `pending`, `completed`, `overdue` or `cancelled`.
    pub status: String,
}

/// Query string for `GET /schedules`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleQuery {
    /// Restricts results to one covenant.
    pub covenant_id: Option<String>,
}

/// Query string for `GET /covenants`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CovenantQuery {
    /// Restricts results to one transaction.
    pub transaction_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;

    #[test]
    fn test_deserialize_generate_request() {
        let json = r#"{
            "transaction": {
                "transaction_id": "TXN-001",
                "name": "Corporate Credit Facility",
                "start_date": "2025-01-15",
                "end_date": "2027-01-15"
            },
            "covenants": [{
                "covenant_id": "COV-001",
                "transaction_id": "TXN-001",
                "description": "Monthly Financial Statements",
                "frequency": "MONTHLY",
                "owner_email": "finance@company.com"
            }]
        }"#;

        let request: GenerateRequest = serde_json::from_str(json).unwrap();
        let (transaction, covenants) = request.into_domain().unwrap();
        assert_eq!(transaction.transaction_id, "TXN-001");
        assert_eq!(covenants.len(), 1);
        assert_eq!(covenants[0].frequency.as_str(), "monthly");
    }

    #[test]
    fn test_missing_covenants_defaults_to_empty() {
        let json = r#"{"transaction": {"transaction_id": "TXN-001"}}"#;
        let request: GenerateRequest = serde_json::from_str(json).unwrap();
        assert!(request.covenants.is_empty());
    }

    #[test]
    fn test_missing_transaction_field_names_field() {
        let json = r#"{"transaction": {"transaction_id": "TXN-001", "name": "Loan"}}"#;
        let request: GenerateRequest = serde_json::from_str(json).unwrap();

        match request.into_domain() {
            Err(ScheduleError::InvalidTransaction { field, .. }) => {
                assert_eq!(field, "start_date");
            }
            other => panic!("Expected InvalidTransaction, got {:?}", other),
        }
    }

    #[test]
    fn test_first_failing_covenant_in_order_is_reported() {
        // COV-001 names another transaction; COV-002 has a malformed email
        let json = r#"{
            "transaction": {
                "transaction_id": "TXN-001",
                "name": "Corporate Credit Facility",
                "start_date": "2025-01-15",
                "end_date": "2027-01-15"
            },
            "covenants": [
                {
                    "covenant_id": "COV-001",
                    "transaction_id": "TXN-999",
                    "description": "Monthly Financial Statements",
                    "frequency": "monthly",
                    "owner_email": "finance@company.com"
                },
                {
                    "covenant_id": "COV-002",
                    "transaction_id": "TXN-001",
                    "description": "Quarterly Certificate",
                    "frequency": "quarterly",
                    "owner_email": "not-an-email"
                }
            ]
        }"#;
        let request: GenerateRequest = serde_json::from_str(json).unwrap();

        match request.into_domain() {
            Err(ScheduleError::TransactionMismatch { covenant_id, .. }) => {
                assert_eq!(covenant_id, "COV-001");
            }
            other => panic!("Expected TransactionMismatch, got {:?}", other),
        }
    }
}
