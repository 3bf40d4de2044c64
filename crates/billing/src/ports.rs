//! Storage collaborators consumed by the engine.
//!
//! Ports are synchronous and `Send + Sync` so an engine can be shared behind an
//! `Arc` by the HTTP layer. Implementations live in `facturation-infra`.

use chrono::NaiveDate;

use facturation_clients::Client;
use facturation_core::{ClientId, InvoiceId, InvoiceLineId};
use facturation_invoicing::{Invoice, InvoicePeriod, InvoiceReference, NewInvoice, NewInvoiceLine};
use facturation_planning::{EventCategory, ScheduleEntry};

use crate::error::StorageError;

/// Candidate filter for one billing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleQuery {
    /// First day, inclusive.
    pub from: NaiveDate,
    /// Last day, inclusive.
    pub to: NaiveDate,
    pub categories: Vec<EventCategory>,
    /// Restrict to these clients; `None` or an empty list means every client.
    pub client_ids: Option<Vec<ClientId>>,
}

impl ScheduleQuery {
    /// Reference predicate: date in range, eligible category, positive pricing and
    /// (when set) an allowed client.
    pub fn matches(&self, entry: &ScheduleEntry) -> bool {
        if entry.date < self.from || entry.date > self.to {
            return false;
        }
        if !self.categories.contains(&entry.category) || !entry.has_positive_pricing() {
            return false;
        }
        match self.client_ids.as_deref() {
            None | Some([]) => true,
            Some(allowed) => entry
                .client_id
                .is_some_and(|id| allowed.contains(&id)),
        }
    }
}

pub trait ClientDirectory: Send + Sync {
    fn find_client(&self, id: ClientId) -> Result<Option<Client>, StorageError>;
}

pub trait ScheduleStore: Send + Sync {
    /// Entries matching `query` (see [`ScheduleQuery::matches`]), in date order.
    fn find_billable_candidates(&self, query: &ScheduleQuery) -> Result<Vec<ScheduleEntry>, StorageError>;
}

/// Invoice persistence used by commits.
///
/// An invoice is created as a draft, receives its lines, then is issued. A failed
/// commit discards its draft.
pub trait InvoiceRepository: Send + Sync {
    /// Reserve the next reference of `year`. Reserved references are never reused.
    fn next_reference(&self, prefix: &str, year: i32) -> Result<InvoiceReference, StorageError>;

    fn find_for_client_period(
        &self,
        client_id: ClientId,
        period: InvoicePeriod,
    ) -> Result<Option<Invoice>, StorageError>;

    fn create_invoice(&self, invoice: NewInvoice) -> Result<InvoiceId, StorageError>;

    fn add_line(&self, invoice_id: InvoiceId, line: NewInvoiceLine) -> Result<InvoiceLineId, StorageError>;

    fn issue_invoice(&self, invoice_id: InvoiceId) -> Result<(), StorageError>;

    fn discard_invoice(&self, invoice_id: InvoiceId) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use facturation_core::{Money, ScheduleEntryId};

    fn query(client_ids: Option<Vec<ClientId>>) -> ScheduleQuery {
        ScheduleQuery {
            from: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            categories: EventCategory::BILLABLE_DEFAULT.to_vec(),
            client_ids,
        }
    }

    fn entry(y: i32, m: u32, d: u32) -> ScheduleEntry {
        ScheduleEntry::new(
            ScheduleEntryId::new(),
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            EventCategory::Intervention,
        )
        .with_flat_fee(Money::from_units(10))
    }

    #[test]
    fn date_range_is_inclusive() {
        let q = query(None);
        assert!(q.matches(&entry(2025, 3, 1)));
        assert!(q.matches(&entry(2025, 3, 31)));
        assert!(!q.matches(&entry(2025, 4, 1)));
        assert!(!q.matches(&entry(2025, 2, 28)));
    }

    #[test]
    fn unpriced_or_ineligible_entries_do_not_match() {
        let q = query(None);
        let mut e = entry(2025, 3, 5);
        e.flat_fee = None;
        assert!(!q.matches(&e));

        let mut e = entry(2025, 3, 5);
        e.category = EventCategory::Maladie;
        assert!(!q.matches(&e));
    }

    #[test]
    fn client_filter_excludes_other_and_missing_clients() {
        let wanted = ClientId::new();
        let q = query(Some(vec![wanted]));
        assert!(q.matches(&entry(2025, 3, 5).with_client(wanted)));
        assert!(!q.matches(&entry(2025, 3, 5).with_client(ClientId::new())));
        assert!(!q.matches(&entry(2025, 3, 5)));
    }

    #[test]
    fn empty_client_filter_matches_everyone() {
        let q = query(Some(Vec::new()));
        assert!(q.matches(&entry(2025, 3, 5).with_client(ClientId::new())));
        assert!(q.matches(&entry(2025, 3, 5)));
    }
}
