//! Pricing of one billable entry.

use chrono::NaiveDate;
use serde::Serialize;

use facturation_core::{DomainResult, Money, ScheduleEntryId, TaxRate};
use facturation_planning::ScheduleEntry;

use crate::classify::PricingMode;

const MINUTES_PER_HOUR: i64 = 60;

/// One billable service occurrence, priced and rounded to the cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedPrestation {
    pub entry_id: ScheduleEntryId,
    pub date: NaiveDate,
    pub service: String,
    pub subject: String,
    pub mode: PricingMode,
    pub hourly_rate: Option<Money>,
    pub flat_fee: Option<Money>,
    pub duration_minutes: u32,
    pub ht: Money,
    pub tax: Money,
    pub ttc: Money,
}

impl PricedPrestation {
    /// Duration in hours, rounded to 2 decimals.
    pub fn hours(&self) -> f64 {
        minutes_to_hours(u64::from(self.duration_minutes))
    }

    /// Prestations sharing this key end up on the same invoice line.
    pub fn group_key(&self) -> (&str, &str, PricingMode) {
        (&self.service, &self.subject, self.mode)
    }
}

/// Price a classified entry.
///
/// Hourly: `rate × minutes / 60`. Flat: the fee. Tax is `HT × tax_rate`; each amount
/// is rounded half-up to the cent here, and never again. Fails when an amount does
/// not fit in cents.
pub fn price(
    entry: &ScheduleEntry,
    mode: PricingMode,
    duration_minutes: u32,
    tax_rate: TaxRate,
) -> DomainResult<PricedPrestation> {
    let ht = match mode {
        PricingMode::Flat => entry.flat_fee.unwrap_or(Money::ZERO),
        PricingMode::Hourly => entry
            .hourly_rate
            .unwrap_or(Money::ZERO)
            .mul_ratio(i64::from(duration_minutes), MINUTES_PER_HOUR)?,
    };
    let tax = tax_rate.tax_on(ht)?;
    Ok(PricedPrestation {
        entry_id: entry.id,
        date: entry.date,
        service: entry.service_label().to_string(),
        subject: entry.subject_label().to_string(),
        mode,
        hourly_rate: entry.hourly_rate,
        flat_fee: entry.flat_fee,
        duration_minutes,
        ht,
        tax,
        ttc: ht.checked_add(tax)?,
    })
}

pub(crate) fn minutes_to_hours(minutes: u64) -> f64 {
    (minutes as f64 / 60.0 * 100.0).round() / 100.0
}
