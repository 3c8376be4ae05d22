//! Business-day calendar for the schedule generator.
//!
//! This module contains the business-day engine (weekend and holiday
//! detection plus bounded adjustment), the holiday providers that feed it,
//! and the month arithmetic the periodic generators rely on.

mod business_day;
mod dates;
mod holidays;

pub use business_day::{AdjustmentDirection, BusinessCalendar, MAX_ADJUSTMENT_STEPS, is_weekend};
pub use dates::{
    add_days, add_months, february_end, is_last_day_of_month, last_day_of_month,
    with_day_or_month_end,
};
pub use holidays::{
    HolidayCalendarFile, HolidayProvider, HolidayRecord, StaticHolidayProvider,
    YamlHolidayProvider,
};
