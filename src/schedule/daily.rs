//! Daily schedules: one entry per business day in the transaction.

use crate::calendar::{BusinessCalendar, add_days};
use crate::error::ScheduleResult;
use crate::models::{Covenant, ScheduleEntry, Transaction};

/// Generates one entry for each business day in `[start, end)`.
///
/// Each entry's period is the single day it reports on; it falls due on the
/// following day, business-day adjusted. Non-business days produce nothing
/// and consume no sequence index, so a range made entirely of holidays never
/// asks the calendar to adjust anything.
pub fn generate_daily(
    calendar: &BusinessCalendar,
    transaction: &Transaction,
    covenant: &Covenant,
) -> ScheduleResult<Vec<ScheduleEntry>> {
    let end = transaction.end_date;
    let mut entries = Vec::new();
    let mut index: u32 = 1;
    let mut current = transaction.start_date;

    while current < end {
        let next = add_days(current, 1)?;
        if calendar.is_business_day(current) {
            let due_date = calendar.adjust(next)?;
            if due_date > end {
                break;
            }
            entries.push(ScheduleEntry::pending(
                &covenant.covenant_id,
                index,
                due_date,
                current,
                current,
            ));
            index += 1;
        }
        current = next;
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::AdjustmentDirection;
    use crate::models::Frequency;
    use chrono::NaiveDate;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_transaction(start: &str, end: &str) -> Transaction {
        Transaction {
            transaction_id: "TXN-001".to_string(),
            name: "Overnight Repo".to_string(),
            start_date: make_date(start),
            end_date: make_date(end),
        }
    }

    fn make_covenant() -> Covenant {
        Covenant {
            covenant_id: "COV-D".to_string(),
            transaction_id: "TXN-001".to_string(),
            description: "Daily Margin Call".to_string(),
            frequency: Frequency::Daily,
            owner_email: "ops@company.com".to_string(),
        }
    }

    #[test]
    fn test_daily_skips_weekend_days() {
        let calendar = BusinessCalendar::new([], AdjustmentDirection::Forward);
        // Thursday to the following Tuesday
        let transaction = make_transaction("2025-01-09", "2025-01-14");
        let entries = generate_daily(&calendar, &transaction, &make_covenant()).unwrap();

        let pairs: Vec<(String, String)> = entries
            .iter()
            .map(|e| (e.period_start.to_string(), e.due_date.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("2025-01-09".to_string(), "2025-01-10".to_string()),
                ("2025-01-10".to_string(), "2025-01-13".to_string()),
                ("2025-01-13".to_string(), "2025-01-14".to_string()),
            ]
        );
        assert!(entries.iter().all(|e| e.period_start == e.period_end));
        assert_eq!(entries[2].schedule_id, "SCH-COV-D-003");
    }

    #[test]
    fn test_all_holiday_range_yields_nothing_without_error() {
        let holidays = make_date("2025-06-01")
            .iter_days()
            .take_while(|d| *d <= make_date("2025-06-30"));
        let calendar = BusinessCalendar::new(holidays, AdjustmentDirection::Forward);
        let transaction = make_transaction("2025-06-01", "2025-06-30");

        match generate_daily(&calendar, &transaction, &make_covenant()) {
            Ok(entries) => assert!(entries.is_empty()),
            Err(e) => panic!("Expected no entries, got error {:?}", e),
        }
    }

    #[test]
    fn test_single_day_transaction_yields_nothing() {
        let calendar = BusinessCalendar::new([], AdjustmentDirection::Forward);
        let transaction = make_transaction("2025-01-09", "2025-01-09");
        let entries = generate_daily(&calendar, &transaction, &make_covenant()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_friday_entry_dropped_when_monday_is_past_end() {
        let calendar = BusinessCalendar::new([], AdjustmentDirection::Forward);
        // Friday to Sunday: the Friday report is due Monday, after the end
        let transaction = make_transaction("2025-01-10", "2025-01-12");
        let entries = generate_daily(&calendar, &transaction, &make_covenant()).unwrap();
        assert!(entries.is_empty());
    }
}
