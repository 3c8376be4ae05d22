//! Covenant model, reporting frequencies, and owner email validation.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// How often a covenant falls due.
///
/// Parsing is case-insensitive; the canonical form is lowercase.
///
/// # Example
///
/// ```
/// use covenant_schedule::models::Frequency;
///
/// let frequency: Frequency = "Quarterly".parse().unwrap();
/// assert_eq!(frequency, Frequency::Quarterly);
/// assert_eq!(frequency.period_months(), Some(3));
/// assert!("fortnightly".parse::<Frequency>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    /// Due the business day after every business day.
    Daily,
    /// Due the day after every 7-day window.
    Weekly,
    /// Due every month on the anniversary day.
    Monthly,
    /// Due every three months on the anniversary day.
    Quarterly,
    /// Due every twelve months on the anniversary day.
    Annually,
}

impl Frequency {
    /// Every supported frequency, in ascending period length.
    pub const ALL: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Annually,
    ];

    /// The canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annually => "annually",
        }
    }

    /// Period length in months for calendar-month frequencies.
    pub fn period_months(self) -> Option<u32> {
        match self {
            Frequency::Monthly => Some(1),
            Frequency::Quarterly => Some(3),
            Frequency::Annually => Some(12),
            Frequency::Daily | Frequency::Weekly => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    fn from_str(s: &str) -> ScheduleResult<Self> {
        Frequency::ALL
            .into_iter()
            .find(|frequency| frequency.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ScheduleError::UnsupportedFrequency {
                frequency: s.to_string(),
            })
    }
}

impl TryFrom<String> for Frequency {
    type Error = ScheduleError;

    fn try_from(value: String) -> ScheduleResult<Self> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.as_str().to_string()
    }
}

/// Returns true when `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// A recurring compliance obligation attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Covenant {
    /// Identifier, unique within a generation batch.
    pub covenant_id: String,
    /// The transaction this covenant belongs to.
    pub transaction_id: String,
    /// What has to be delivered.
    pub description: String,
    /// How often it falls due.
    pub frequency: Frequency,
    /// Accountable owner.
    pub owner_email: String,
}

impl Covenant {
    /// Checks identifier presence and the owner email format.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.covenant_id.trim().is_empty() {
            return Err(invalid(&self.covenant_id, "covenant_id", "must not be empty"));
        }
        if self.transaction_id.trim().is_empty() {
            return Err(invalid(
                &self.covenant_id,
                "transaction_id",
                "must not be empty",
            ));
        }
        if !is_valid_email(&self.owner_email) {
            return Err(invalid(
                &self.covenant_id,
                "owner_email",
                format!("not a valid email address: {}", self.owner_email),
            ));
        }
        Ok(())
    }
}

/// Raw covenant fields as received at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CovenantInput {
    /// Identifier, unique within a generation batch.
    #[serde(default)]
    pub covenant_id: Option<String>,
    /// The transaction this covenant belongs to.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// What has to be delivered.
    #[serde(default)]
    pub description: Option<String>,
    /// Frequency name, any case.
    #[serde(default)]
    pub frequency: Option<String>,
    /// Accountable owner.
    #[serde(default)]
    pub owner_email: Option<String>,
}

impl TryFrom<CovenantInput> for Covenant {
    type Error = ScheduleError;

    fn try_from(input: CovenantInput) -> ScheduleResult<Self> {
        let covenant_id = input.covenant_id.clone().unwrap_or_default();
        let require = |field: &str, value: Option<String>| {
            value.ok_or_else(|| invalid(&covenant_id, field, "missing required field"))
        };

        let covenant_id_value = require("covenant_id", input.covenant_id)?;
        let transaction_id = require("transaction_id", input.transaction_id)?;
        let description = require("description", input.description)?;
        let raw_frequency = require("frequency", input.frequency)?;
        let owner_email = require("owner_email", input.owner_email)?;

        let frequency = raw_frequency.parse::<Frequency>().map_err(|_| {
            invalid(
                &covenant_id,
                "frequency",
                format!(
                    "must be one of daily, weekly, monthly, quarterly, annually; got '{}'",
                    raw_frequency
                ),
            )
        })?;

        let covenant = Covenant {
            covenant_id: covenant_id_value,
            transaction_id,
            description,
            frequency,
            owner_email,
        };
        covenant.validate()?;
        Ok(covenant)
    }
}

fn invalid(covenant_id: &str, field: &str, message: impl Into<String>) -> ScheduleError {
    ScheduleError::InvalidCovenant {
        covenant_id: covenant_id.to_string(),
        field: field.to_string(),
        message: message.into(),
    }
}
