//! Aging bucket classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day-range classification of how overdue an outstanding invoice is.
///
/// Boundaries resolve toward the lower (older) bucket at exactly
/// 30/60/90/180/365 days past due: 30 days falls in `0-30`, 31 in `31-60`.
/// Invoices not yet due report in `0-30`; callers may flag them separately
/// as current via [`is_current`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgingBucket {
    /// 0-30 days past due (including not yet due).
    #[serde(rename = "0-30")]
    Days0To30,
    /// 31-60 days past due.
    #[serde(rename = "31-60")]
    Days31To60,
    /// 61-90 days past due.
    #[serde(rename = "61-90")]
    Days61To90,
    /// 91-180 days past due.
    #[serde(rename = "91-180")]
    Days91To180,
    /// 181-365 days past due.
    #[serde(rename = "181-365")]
    Days181To365,
    /// More than 365 days past due.
    #[serde(rename = "365+")]
    Over365,
}

impl AgingBucket {
    /// All buckets, oldest boundary last.
    pub const ALL: [Self; 6] = [
        Self::Days0To30,
        Self::Days31To60,
        Self::Days61To90,
        Self::Days91To180,
        Self::Days181To365,
        Self::Over365,
    ];

    /// Returns the report label for this bucket.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Days0To30 => "0-30",
            Self::Days31To60 => "31-60",
            Self::Days61To90 => "61-90",
            Self::Days91To180 => "91-180",
            Self::Days181To365 => "181-365",
            Self::Over365 => "365+",
        }
    }

    /// Classifies a number of days past due.
    #[must_use]
    pub const fn for_days_past_due(days: i64) -> Self {
        match days {
            i64::MIN..=30 => Self::Days0To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            91..=180 => Self::Days91To180,
            181..=365 => Self::Days181To365,
            _ => Self::Over365,
        }
    }

    /// Classifies an invoice by due date as of a reporting date.
    #[must_use]
    pub fn bucket_for(due_date: NaiveDate, as_of: NaiveDate) -> Self {
        Self::for_days_past_due((as_of - due_date).num_days())
    }
}

impl std::fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Returns true when the invoice is not yet past due as of the given date.
#[must_use]
pub fn is_current(due_date: NaiveDate, as_of: NaiveDate) -> bool {
    as_of <= due_date
}
