//! Calendar month ranges.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use facturation_invoicing::InvoicePeriod;

use crate::config::BillingConfig;
use crate::error::BillingError;

const MONTH_NAMES: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// French name of a month (1-based).
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(idx).copied()
}

/// One validated calendar month.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BillingPeriod {
    month: u32,
    year: i32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl BillingPeriod {
    /// Validate `(month, year)` against the configured year bounds.
    pub fn new(month: u32, year: i32, config: &BillingConfig) -> Result<Self, BillingError> {
        let invalid = || BillingError::InvalidPeriod { month, year };
        if !(1..=12).contains(&month) || year < config.min_year || year > config.max_year {
            return Err(invalid());
        }
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;
        Ok(Self {
            month,
            year,
            first_day,
            last_day,
        })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month).unwrap_or_default()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn days(&self) -> u32 {
        self.last_day.day()
    }

    /// First day at 00:00:00 UTC.
    pub fn start(&self) -> DateTime<Utc> {
        self.first_day.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Last day at 23:59:59 UTC.
    pub fn end(&self) -> DateTime<Utc> {
        let end_of_day = chrono::NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(chrono::NaiveTime::MIN);
        self.last_day.and_time(end_of_day).and_utc()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }

    pub fn invoice_period(&self) -> InvoicePeriod {
        InvoicePeriod::new(self.year, self.month)
    }

    /// Invoice subject, e.g. "Facturation Mars 2025".
    pub fn invoice_subject(&self) -> String {
        format!("Facturation {} {}", self.month_name(), self.year)
    }
}
