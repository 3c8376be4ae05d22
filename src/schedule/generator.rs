//! The schedule generator: validation, feasibility gate and dispatch.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::calendar::{AdjustmentDirection, BusinessCalendar, HolidayProvider};
use crate::config::{GeneratorConfig, HolidaySource};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{Covenant, Frequency, ScheduleEntry, Transaction};

use super::daily::generate_daily;
use super::feasibility::is_feasible;
use super::periodic::{generate_annually, generate_monthly, generate_quarterly};
use super::validation::validate_batch;
use super::weekly::generate_weekly;

type GenerateFn =
    fn(&BusinessCalendar, &Transaction, &Covenant) -> ScheduleResult<Vec<ScheduleEntry>>;

const GENERATORS: [(Frequency, GenerateFn); 5] = [
    (Frequency::Daily, generate_daily),
    (Frequency::Weekly, generate_weekly),
    (Frequency::Monthly, generate_monthly),
    (Frequency::Quarterly, generate_quarterly),
    (Frequency::Annually, generate_annually),
];

fn generator_for(frequency: Frequency) -> ScheduleResult<GenerateFn> {
    GENERATORS
        .iter()
        .find(|(candidate, _)| *candidate == frequency)
        .map(|(_, generate)| *generate)
        .ok_or_else(|| ScheduleError::UnsupportedFrequency {
            frequency: frequency.to_string(),
        })
}

/// Produces compliance schedules for a transaction's covenants.
///
/// The generator owns its holiday set and adjustment direction, both fixed
/// at construction. [`ScheduleGenerator::generate`] is a pure function of
/// those and its inputs, so one instance can be shared across threads and
/// repeated calls with the same inputs return the same entries.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use covenant_schedule::calendar::AdjustmentDirection;
/// use covenant_schedule::models::{Covenant, Frequency, Transaction};
/// use covenant_schedule::schedule::ScheduleGenerator;
///
/// let generator = ScheduleGenerator::new([], AdjustmentDirection::Forward);
/// let transaction = Transaction {
///     transaction_id: "TXN-001".to_string(),
///     name: "Term Loan".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2027, 1, 15).unwrap(),
/// };
/// let covenant = Covenant {
///     covenant_id: "COV-001".to_string(),
///     transaction_id: "TXN-001".to_string(),
///     description: "Monthly Financial Statements".to_string(),
///     frequency: Frequency::Monthly,
///     owner_email: "finance@company.com".to_string(),
/// };
///
/// let entries = generator.generate(&transaction, &[covenant]).unwrap();
/// assert_eq!(entries.len(), 24);
/// assert_eq!(entries[0].schedule_id, "SCH-COV-001-001");
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    calendar: BusinessCalendar,
}

impl ScheduleGenerator {
    /// Creates a generator over an explicit holiday set.
    pub fn new(
        holidays: impl IntoIterator<Item = NaiveDate>,
        direction: AdjustmentDirection,
    ) -> Self {
        Self {
            calendar: BusinessCalendar::new(holidays, direction),
        }
    }

    /// Creates a generator whose holidays come from `provider`.
    ///
    /// A provider failure never aborts construction: the error is logged and
    /// the generator falls back to weekends only.
    pub fn with_provider<P: HolidayProvider + ?Sized>(
        provider: &P,
        country: &str,
        years: &[i32],
        direction: AdjustmentDirection,
    ) -> Self {
        let holidays = provider.holidays(country, years).unwrap_or_else(|e| {
            warn!(
                country = %country,
                years = ?years,
                error = %e,
                "Holiday lookup failed, using an empty holiday set"
            );
            BTreeSet::new()
        });
        debug!(country = %country, holiday_count = holidays.len(), "Loaded holidays");
        Self::new(holidays, direction)
    }

    /// Creates a generator from parsed configuration.
    ///
    /// Explicit `holidays` take precedence over a `calendar` lookup.
    pub fn from_config<P: HolidayProvider + ?Sized>(
        config: &GeneratorConfig,
        provider: &P,
    ) -> Self {
        let direction = config.business_day_adjustment;
        match config.holiday_source() {
            HolidaySource::Explicit(dates) => Self::new(dates, direction),
            HolidaySource::Calendar(lookup) => {
                Self::with_provider(provider, &lookup.country, &lookup.years, direction)
            }
            HolidaySource::None => Self::new([], direction),
        }
    }

    /// The business-day calendar used for adjustment.
    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    /// Generates the full schedule for `covenants` under `transaction`.
    ///
    /// The whole batch is validated first; any invalid input aborts the call
    /// with no partial output. Covenants whose frequency cannot fit inside the
    /// transaction produce no entries. Results are concatenated in covenant
    /// order.
    ///
    /// # Errors
    ///
    /// Returns the validation errors described on [`validate_batch`] and
    /// [`ScheduleError::BusinessDayNotFound`] when a due date cannot be moved
    /// onto a business day.
    pub fn generate(
        &self,
        transaction: &Transaction,
        covenants: &[Covenant],
    ) -> ScheduleResult<Vec<ScheduleEntry>> {
        validate_batch(transaction, covenants)?;

        let duration_days = transaction.duration_days();
        let mut entries = Vec::new();

        for covenant in covenants {
            if !is_feasible(covenant.frequency, duration_days) {
                debug!(
                    covenant_id = %covenant.covenant_id,
                    frequency = %covenant.frequency,
                    duration_days,
                    "Skipping covenant that cannot fall due within the transaction"
                );
                continue;
            }

            let generate = generator_for(covenant.frequency)?;
            let covenant_entries = generate(&self.calendar, transaction, covenant)?;
            debug!(
                covenant_id = %covenant.covenant_id,
                entry_count = covenant_entries.len(),
                "Generated covenant schedule"
            );
            entries.extend(covenant_entries);
        }

        info!(
            transaction_id = %transaction.transaction_id,
            covenant_count = covenants.len(),
            entry_count = entries.len(),
            "Generated schedules"
        );

        Ok(entries)
    }
}
