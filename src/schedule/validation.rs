//! Batch validation run before any schedule is computed.

use std::collections::HashSet;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{Covenant, Transaction};

/// Validates a transaction and its covenants as one batch.
///
/// Checks run eagerly over the whole batch, so one bad covenant rejects the
/// batch before any entry is produced.
///
/// # Errors
///
/// - [`ScheduleError::InvalidTransaction`] for a blank id or inverted dates
/// - [`ScheduleError::InvalidCovenant`] for a blank id or a malformed email
/// - [`ScheduleError::TransactionMismatch`] when a covenant belongs elsewhere
/// - [`ScheduleError::DuplicateCovenant`] when an id repeats in the batch
pub fn validate_batch(transaction: &Transaction, covenants: &[Covenant]) -> ScheduleResult<()> {
    transaction.validate()?;

    let mut seen_covenant_ids = HashSet::with_capacity(covenants.len());
    for covenant in covenants {
        covenant.validate()?;
        check_membership(transaction, covenant, &mut seen_covenant_ids)?;
    }

    Ok(())
}

/// Checks that `covenant` belongs to `transaction` and that its id has not
/// been seen earlier in the batch, recording the id in `seen_covenant_ids`.
pub fn check_membership(
    transaction: &Transaction,
    covenant: &Covenant,
    seen_covenant_ids: &mut HashSet<String>,
) -> ScheduleResult<()> {
    if covenant.transaction_id != transaction.transaction_id {
        return Err(ScheduleError::TransactionMismatch {
            covenant_id: covenant.covenant_id.clone(),
            expected: transaction.transaction_id.clone(),
            actual: covenant.transaction_id.clone(),
        });
    }

    if !seen_covenant_ids.insert(covenant.covenant_id.clone()) {
        return Err(ScheduleError::DuplicateCovenant {
            covenant_id: covenant.covenant_id.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;
    use chrono::NaiveDate;

    fn make_transaction() -> Transaction {
        Transaction {
            transaction_id: "TXN-001".to_string(),
            name: "Corporate Credit Facility".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2027, 1, 15).unwrap(),
        }
    }

    fn make_covenant(covenant_id: &str) -> Covenant {
        Covenant {
            covenant_id: covenant_id.to_string(),
            transaction_id: "TXN-001".to_string(),
            description: "Monthly Financial Statements".to_string(),
            frequency: Frequency::Monthly,
            owner_email: "finance@company.com".to_string(),
        }
    }

    #[test]
    fn test_valid_batch_passes() {
        let covenants = vec![make_covenant("COV-001"), make_covenant("COV-002")];
        assert!(validate_batch(&make_transaction(), &covenants).is_ok());
    }

    #[test]
    fn test_empty_covenant_list_passes() {
        assert!(validate_batch(&make_transaction(), &[]).is_ok());
    }

    #[test]
    fn test_inverted_transaction_dates_fail() {
        let mut transaction = make_transaction();
        transaction.start_date = NaiveDate::from_ymd_opt(2028, 1, 1).unwrap();
        assert!(matches!(
            validate_batch(&transaction, &[]),
            Err(ScheduleError::InvalidTransaction { .. })
        ));
    }

    #[test]
    fn test_referential_mismatch_fails() {
        let mut covenant = make_covenant("COV-001");
        covenant.transaction_id = "TXN-999".to_string();

        match validate_batch(&make_transaction(), &[covenant]) {
            Err(ScheduleError::TransactionMismatch {
                covenant_id,
                expected,
                actual,
            }) => {
                assert_eq!(covenant_id, "COV-001");
                assert_eq!(expected, "TXN-001");
                assert_eq!(actual, "TXN-999");
            }
            other => panic!("Expected TransactionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_covenant_ids_fail() {
        let covenants = vec![
            make_covenant("COV-001"),
            make_covenant("COV-002"),
            make_covenant("COV-001"),
        ];

        match validate_batch(&make_transaction(), &covenants) {
            Err(ScheduleError::DuplicateCovenant { covenant_id }) => {
                assert_eq!(covenant_id, "COV-001");
            }
            other => panic!("Expected DuplicateCovenant, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_email_late_in_batch_fails_whole_batch() {
        let mut bad = make_covenant("COV-003");
        bad.owner_email = "finance.company.com".to_string();
        let covenants = vec![make_covenant("COV-001"), make_covenant("COV-002"), bad];

        assert!(matches!(
            validate_batch(&make_transaction(), &covenants),
            Err(ScheduleError::InvalidCovenant { .. })
        ));
    }
}
