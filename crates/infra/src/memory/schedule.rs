use facturation_billing::{ScheduleQuery, ScheduleStore, StorageError};
use facturation_core::ScheduleEntryId;
use facturation_planning::ScheduleEntry;

use super::keyed_store::InMemoryKeyedStore;

/// In-memory schedule entry store.
#[derive(Debug, Default)]
pub struct InMemoryScheduleStore {
    entries: InMemoryKeyedStore<ScheduleEntryId, ScheduleEntry>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry: ScheduleEntry) -> Result<ScheduleEntryId, StorageError> {
        let id = entry.id;
        self.entries.upsert(id, entry)?;
        Ok(id)
    }

    pub fn get(&self, id: ScheduleEntryId) -> Result<Option<ScheduleEntry>, StorageError> {
        self.entries.get(&id)
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn find_billable_candidates(
        &self,
        query: &ScheduleQuery,
    ) -> Result<Vec<ScheduleEntry>, StorageError> {
        let mut entries = self.entries.filter(|e| query.matches(e))?;
        entries.sort_by_key(|e| (e.date, e.start_time, e.id));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use facturation_core::{ClientId, Money};
    use facturation_planning::EventCategory;

    #[test]
    fn candidates_are_filtered_and_date_ordered() {
        let store = InMemoryScheduleStore::new();
        let client = ClientId::new();
        let on = |d: u32, h: u32| {
            ScheduleEntry::new(
                ScheduleEntryId::new(),
                NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
                EventCategory::Intervention,
            )
            .with_client(client)
            .with_flat_fee(Money::from_units(10))
            .with_times(
                NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(h + 1, 0, 0).unwrap(),
            )
        };
        let late = store.insert(on(20, 9)).unwrap();
        let afternoon = store.insert(on(2, 14)).unwrap();
        let morning = store.insert(on(2, 8)).unwrap();
        store.insert(on(31, 9).with_flat_fee(Money::ZERO)).unwrap();

        let query = ScheduleQuery {
            from: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            categories: EventCategory::BILLABLE_DEFAULT.to_vec(),
            client_ids: None,
        };
        let ids: Vec<ScheduleEntryId> = store
            .find_billable_candidates(&query)
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![morning, afternoon, late]);
    }
}
