use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use facturation_core::{ClientId, Entity, Money, ScheduleEntryId};

use crate::category::EventCategory;

/// Subject used on invoice lines when the entry has none.
pub const DEFAULT_SUBJECT: &str = "Prestation";

const MINUTES_PER_DAY: i64 = 24 * 60;

/// One scheduled service occurrence.
///
/// Pricing is expressed either as an hourly rate (paired with a duration) or as a
/// flat fee. Both may be present; billing decides which one wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: ScheduleEntryId,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Explicit duration, when the scheduler stored one.
    pub duration_minutes: Option<u32>,
    pub client_id: Option<ClientId>,
    pub category: EventCategory,
    /// Service label ("prestation").
    pub service: Option<String>,
    /// Subject ("objet").
    pub subject: Option<String>,
    /// Hourly rate (per hour, in cents).
    pub hourly_rate: Option<Money>,
    pub flat_fee: Option<Money>,
}

impl ScheduleEntry {
    pub fn new(id: ScheduleEntryId, date: NaiveDate, category: EventCategory) -> Self {
        Self {
            id,
            date,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            client_id: None,
            category,
            service: None,
            subject: None,
            hourly_rate: None,
            flat_fee: None,
        }
    }

    pub fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_hourly_rate(mut self, rate: Money) -> Self {
        self.hourly_rate = Some(rate);
        self
    }

    pub fn with_flat_fee(mut self, fee: Money) -> Self {
        self.flat_fee = Some(fee);
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Client this entry should be billed to. A nil id counts as no client.
    pub fn billed_client(&self) -> Option<ClientId> {
        self.client_id.filter(|id| !id.is_nil())
    }

    /// Worked duration in minutes.
    ///
    /// Uses the stored duration when present, otherwise `end - start`; an end time
    /// earlier than the start time means the work ran past midnight. `None` when
    /// neither is available.
    pub fn worked_minutes(&self) -> Option<u32> {
        if let Some(minutes) = self.duration_minutes {
            return Some(minutes);
        }
        let (start, end) = (self.start_time?, self.end_time?);
        let mut minutes = end.signed_duration_since(start).num_minutes();
        if minutes < 0 {
            minutes += MINUTES_PER_DAY;
        }
        u32::try_from(minutes).ok()
    }

    /// Service label, falling back to the category label.
    pub fn service_label(&self) -> &str {
        non_blank(&self.service).unwrap_or(self.category.label())
    }

    pub fn subject_label(&self) -> &str {
        non_blank(&self.subject).unwrap_or(DEFAULT_SUBJECT)
    }

    /// Whether at least one pricing field carries a positive amount.
    pub fn has_positive_pricing(&self) -> bool {
        self.flat_fee.is_some_and(Money::is_positive)
            || self.hourly_rate.is_some_and(Money::is_positive)
    }
}

impl Entity for ScheduleEntry {
    type Id = ScheduleEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn entry() -> ScheduleEntry {
        ScheduleEntry::new(
            ScheduleEntryId::new(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            EventCategory::Intervention,
        )
    }

    #[test]
    fn duration_is_derived_from_times() {
        assert_eq!(entry().with_times(at(9, 0), at(12, 30)).worked_minutes(), Some(210));
    }

    #[test]
    fn end_before_start_wraps_past_midnight() {
        assert_eq!(entry().with_times(at(22, 0), at(1, 0)).worked_minutes(), Some(180));
    }

    #[test]
    fn explicit_duration_wins_over_times() {
        let e = entry().with_times(at(9, 0), at(10, 0)).with_duration_minutes(180);
        assert_eq!(e.worked_minutes(), Some(180));
    }

    #[test]
    fn missing_end_time_means_no_duration() {
        let mut e = entry();
        e.start_time = Some(at(9, 0));
        assert_eq!(e.worked_minutes(), None);
    }

    #[test]
    fn labels_fall_back_to_category_and_default_subject() {
        let e = entry().with_service("  ");
        assert_eq!(e.service_label(), "Intervention");
        assert_eq!(e.subject_label(), DEFAULT_SUBJECT);

        let e = entry().with_service("Ménage").with_subject("Bureaux");
        assert_eq!(e.service_label(), "Ménage");
        assert_eq!(e.subject_label(), "Bureaux");
    }

    #[test]
    fn nil_client_is_not_a_billed_client() {
        let e = entry().with_client(ClientId::from_uuid(uuid_nil()));
        assert_eq!(e.billed_client(), None);
    }

    fn uuid_nil() -> uuid::Uuid {
        uuid::Uuid::nil()
    }

    proptest! {
        /// Property: a derived duration is always within one day.
        #[test]
        fn derived_duration_is_within_a_day(sh in 0u32..24, sm in 0u32..60, eh in 0u32..24, em in 0u32..60) {
            let minutes = entry().with_times(at(sh, sm), at(eh, em)).worked_minutes().unwrap();
            prop_assert!(minutes < 24 * 60);
        }
    }
}
