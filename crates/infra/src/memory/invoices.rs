use std::collections::HashMap;
use std::sync::Mutex;

use facturation_billing::{InvoiceRepository, StorageError};
use facturation_core::{ClientId, InvoiceId, InvoiceLineId};
use facturation_invoicing::{Invoice, InvoicePeriod, InvoiceReference, NewInvoice, NewInvoiceLine};

use super::keyed_store::InMemoryKeyedStore;

/// In-memory invoice store with per-(prefix, year) reference sequences.
///
/// Reserved sequence numbers are never handed out twice, even when the invoice that
/// reserved one is discarded.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    invoices: InMemoryKeyedStore<InvoiceId, Invoice>,
    sequences: Mutex<HashMap<(String, i32), u32>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, StorageError> {
        self.invoices.get(&id)
    }

    /// All invoices, by reference.
    pub fn list(&self) -> Result<Vec<Invoice>, StorageError> {
        let mut invoices = self.invoices.list()?;
        invoices.sort_by(|a, b| {
            (a.reference.prefix(), a.reference.year(), a.reference.sequence()).cmp(&(
                b.reference.prefix(),
                b.reference.year(),
                b.reference.sequence(),
            ))
        });
        Ok(invoices)
    }

    fn highest_stored_sequence(&self, prefix: &str, year: i32) -> Result<u32, StorageError> {
        Ok(self
            .invoices
            .filter(|i| i.reference.prefix() == prefix && i.reference.year() == year)?
            .iter()
            .map(|i| i.reference.sequence())
            .max()
            .unwrap_or(0))
    }
}

impl InvoiceRepository for InMemoryInvoiceStore {
    fn next_reference(&self, prefix: &str, year: i32) -> Result<InvoiceReference, StorageError> {
        let stored = self.highest_stored_sequence(prefix, year)?;
        let mut sequences = self
            .sequences
            .lock()
            .map_err(|_| StorageError::Unavailable("reference sequence lock poisoned".to_string()))?;
        let last = sequences.entry((prefix.to_string(), year)).or_insert(0);
        *last = (*last).max(stored) + 1;
        Ok(InvoiceReference::new(prefix, year, *last)?)
    }

    fn find_for_client_period(
        &self,
        client_id: ClientId,
        period: InvoicePeriod,
    ) -> Result<Option<Invoice>, StorageError> {
        let mut found = self
            .invoices
            .filter(|i| i.client_id == client_id && i.period == period)?;
        // Issued invoices first.
        found.sort_by_key(|i| !i.is_issued());
        Ok(found.into_iter().next())
    }

    fn create_invoice(&self, invoice: NewInvoice) -> Result<InvoiceId, StorageError> {
        let duplicate = self.invoices.filter(|i| i.reference == invoice.reference)?;
        if !duplicate.is_empty() {
            return Err(StorageError::Rejected(format!(
                "invoice reference {} already exists",
                invoice.reference
            )));
        }
        let invoice = Invoice::draft(InvoiceId::new(), invoice)?;
        let id = invoice.id;
        self.invoices.insert_new(id, invoice)?;
        Ok(id)
    }

    fn add_line(
        &self,
        invoice_id: InvoiceId,
        line: NewInvoiceLine,
    ) -> Result<InvoiceLineId, StorageError> {
        self.invoices.update(&invoice_id, |invoice| {
            Ok(invoice.push_line(InvoiceLineId::new(), line)?.id)
        })
    }

    fn issue_invoice(&self, invoice_id: InvoiceId) -> Result<(), StorageError> {
        self.invoices
            .update(&invoice_id, |invoice| Ok(invoice.issue()?))
    }

    fn discard_invoice(&self, invoice_id: InvoiceId) -> Result<(), StorageError> {
        match self.invoices.remove(&invoice_id)? {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use facturation_core::{Money, TaxRate};

    fn new_invoice(store: &InMemoryInvoiceStore, client_id: ClientId) -> NewInvoice {
        let ht = Money::from_units(100);
        NewInvoice {
            reference: store.next_reference("FAC", 2025).unwrap(),
            client_id,
            period: InvoicePeriod::new(2025, 3),
            issue_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            payment_terms: "Paiement sous 30 jours".to_string(),
            subject: "Facturation Mars 2025".to_string(),
            subtotal_ht: ht,
            total_tax: Money::from_units(20),
            total_ttc: Money::from_units(120),
        }
    }

    fn line() -> NewInvoiceLine {
        NewInvoiceLine {
            description: "Intervention - Prestation (forfait)".to_string(),
            quantity: 1,
            unit_price: Money::from_units(100),
            tax_rate: TaxRate::STANDARD,
        }
    }

    #[test]
    fn sequences_are_per_year_and_never_reused() {
        let store = InMemoryInvoiceStore::new();
        assert_eq!(store.next_reference("FAC", 2025).unwrap().to_string(), "FAC-2025-0001");
        assert_eq!(store.next_reference("FAC", 2025).unwrap().to_string(), "FAC-2025-0002");
        assert_eq!(store.next_reference("FAC", 2026).unwrap().to_string(), "FAC-2026-0001");

        let id = store.create_invoice(new_invoice(&store, ClientId::new())).unwrap();
        store.discard_invoice(id).unwrap();
        assert_eq!(store.next_reference("FAC", 2025).unwrap().sequence(), 4);
    }

    #[test]
    fn draft_lines_then_issue() {
        let store = InMemoryInvoiceStore::new();
        let client = ClientId::new();
        let id = store.create_invoice(new_invoice(&store, client)).unwrap();
        store.add_line(id, line()).unwrap();
        store.issue_invoice(id).unwrap();

        let invoice = store.get(id).unwrap().unwrap();
        assert!(invoice.is_issued());
        assert_eq!(invoice.lines.len(), 1);
        assert!(store.add_line(id, line()).is_err());

        let found = store
            .find_for_client_period(client, InvoicePeriod::new(2025, 3))
            .unwrap()
            .unwrap();
        assert_eq!(found.id, id);
        assert!(
            store
                .find_for_client_period(client, InvoicePeriod::new(2025, 4))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn duplicate_reference_is_rejected() {
        let store = InMemoryInvoiceStore::new();
        let new = new_invoice(&store, ClientId::new());
        store.create_invoice(new.clone()).unwrap();
        assert!(matches!(store.create_invoice(new), Err(StorageError::Rejected(_))));
    }

    #[test]
    fn issuing_without_lines_is_rejected() {
        let store = InMemoryInvoiceStore::new();
        let id = store.create_invoice(new_invoice(&store, ClientId::new())).unwrap();
        assert!(matches!(store.issue_invoice(id), Err(StorageError::Rejected(_))));
        assert_eq!(store.discard_invoice(InvoiceId::new()), Err(StorageError::NotFound));
    }

    #[test]
    fn list_is_ordered_by_reference() {
        let store = InMemoryInvoiceStore::new();
        let first = store.create_invoice(new_invoice(&store, ClientId::new())).unwrap();
        let second = store.create_invoice(new_invoice(&store, ClientId::new())).unwrap();
        let ids: Vec<InvoiceId> = store.list().unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![first, second]);
    }
}
