//! Billable classification of schedule entries.

use serde::{Deserialize, Serialize};

use facturation_planning::ScheduleEntry;

use crate::config::BillingConfig;

/// How a prestation is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    Hourly,
    Flat,
}

impl PricingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PricingMode::Hourly => "hourly",
            PricingMode::Flat => "flat",
        }
    }

    /// Label used in invoice line descriptions.
    pub fn invoice_label(self) -> &'static str {
        match self {
            PricingMode::Hourly => "horaire",
            PricingMode::Flat => "forfait",
        }
    }
}

/// Why an entry was left out of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    IneligibleCategory,
    /// Neither a positive flat fee nor a positive hourly rate.
    NoPricing,
    /// Hourly rate without a positive duration.
    NoDuration,
}

impl core::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            SkipReason::IneligibleCategory => "ineligible category",
            SkipReason::NoPricing => "no positive pricing",
            SkipReason::NoDuration => "no positive duration",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Billable {
        mode: PricingMode,
        /// Always 0 for flat fees.
        duration_minutes: u32,
    },
    Skip(SkipReason),
}

/// Decide whether `entry` can be billed.
///
/// Rules, in order: the category must be eligible; a positive flat fee wins over any
/// hourly fields; otherwise a positive hourly rate needs a positive duration.
pub fn classify(entry: &ScheduleEntry, config: &BillingConfig) -> Classification {
    if !config.is_eligible(entry.category) {
        return Classification::Skip(SkipReason::IneligibleCategory);
    }
    if entry.flat_fee.is_some_and(|fee| fee.is_positive()) {
        return Classification::Billable {
            mode: PricingMode::Flat,
            duration_minutes: 0,
        };
    }
    if entry.hourly_rate.is_some_and(|rate| rate.is_positive()) {
        return match entry.worked_minutes() {
            Some(minutes) if minutes > 0 => Classification::Billable {
                mode: PricingMode::Hourly,
                duration_minutes: minutes,
            },
            _ => Classification::Skip(SkipReason::NoDuration),
        };
    }
    Classification::Skip(SkipReason::NoPricing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use facturation_core::{Money, ScheduleEntryId};
    use facturation_planning::EventCategory;
    use proptest::prelude::*;

    fn entry(category: EventCategory) -> ScheduleEntry {
        ScheduleEntry::new(
            ScheduleEntryId::new(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            category,
        )
    }

    fn at(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn hourly_entry_with_duration_is_billable() {
        let e = entry(EventCategory::Intervention)
            .with_hourly_rate(Money::from_units(50))
            .with_duration_minutes(180);
        assert_eq!(
            classify(&e, &BillingConfig::default()),
            Classification::Billable {
                mode: PricingMode::Hourly,
                duration_minutes: 180
            }
        );
    }

    #[test]
    fn flat_fee_takes_precedence_and_zeroes_duration() {
        let e = entry(EventCategory::Formation)
            .with_flat_fee(Money::from_units(800))
            .with_hourly_rate(Money::from_units(40))
            .with_duration_minutes(600);
        assert_eq!(
            classify(&e, &BillingConfig::default()),
            Classification::Billable {
                mode: PricingMode::Flat,
                duration_minutes: 0
            }
        );
    }

    #[test]
    fn zero_flat_fee_falls_back_to_hourly() {
        let e = entry(EventCategory::Divers)
            .with_flat_fee(Money::ZERO)
            .with_hourly_rate(Money::from_units(30))
            .with_times(at(22), at(1));
        assert_eq!(
            classify(&e, &BillingConfig::default()),
            Classification::Billable {
                mode: PricingMode::Hourly,
                duration_minutes: 180
            }
        );
    }

    #[test]
    fn hourly_rate_without_duration_is_skipped() {
        let e = entry(EventCategory::Intervention).with_hourly_rate(Money::from_units(50));
        assert_eq!(
            classify(&e, &BillingConfig::default()),
            Classification::Skip(SkipReason::NoDuration)
        );

        let e = e.with_times(at(9), at(9));
        assert_eq!(
            classify(&e, &BillingConfig::default()),
            Classification::Skip(SkipReason::NoDuration)
        );
    }

    #[test]
    fn unpriced_entry_is_skipped() {
        let e = entry(EventCategory::Intervention).with_duration_minutes(60);
        assert_eq!(
            classify(&e, &BillingConfig::default()),
            Classification::Skip(SkipReason::NoPricing)
        );
    }

    #[test]
    fn eligible_set_is_configurable() {
        let config = BillingConfig {
            eligible_categories: vec![EventCategory::Reunion],
            ..BillingConfig::default()
        };
        let e = entry(EventCategory::Reunion).with_flat_fee(Money::from_units(10));
        assert!(matches!(classify(&e, &config), Classification::Billable { .. }));
        let e = entry(EventCategory::Intervention).with_flat_fee(Money::from_units(10));
        assert_eq!(
            classify(&e, &config),
            Classification::Skip(SkipReason::IneligibleCategory)
        );
    }

    fn ineligible_category() -> impl Strategy<Value = EventCategory> {
        proptest::sample::select(
            EventCategory::ALL
                .into_iter()
                .filter(|c| !EventCategory::BILLABLE_DEFAULT.contains(c))
                .collect::<Vec<_>>(),
        )
    }

    proptest! {
        /// Property: ineligible categories are never billable, whatever the pricing.
        #[test]
        fn ineligible_category_is_never_billable(
            category in ineligible_category(),
            flat in proptest::option::of(0i64..1_000_000),
            rate in proptest::option::of(0i64..100_000),
            minutes in proptest::option::of(0u32..2_000),
        ) {
            let mut e = entry(category);
            e.flat_fee = flat.map(Money::from_cents);
            e.hourly_rate = rate.map(Money::from_cents);
            e.duration_minutes = minutes;
            prop_assert_eq!(
                classify(&e, &BillingConfig::default()),
                Classification::Skip(SkipReason::IneligibleCategory)
            );
        }

        /// Property: a positive flat fee always yields flat mode with zero duration.
        #[test]
        fn positive_flat_fee_always_wins(
            flat in 1i64..1_000_000,
            rate in proptest::option::of(0i64..100_000),
            minutes in proptest::option::of(0u32..2_000),
        ) {
            let mut e = entry(EventCategory::Intervention).with_flat_fee(Money::from_cents(flat));
            e.hourly_rate = rate.map(Money::from_cents);
            e.duration_minutes = minutes;
            prop_assert_eq!(
                classify(&e, &BillingConfig::default()),
                Classification::Billable { mode: PricingMode::Flat, duration_minutes: 0 }
            );
        }
    }
}
