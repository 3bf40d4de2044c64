use std::sync::Arc;

use facturation_billing::{BillingConfig, BillingEngine, ClientDirectory, StorageError};
use facturation_clients::Client;
use facturation_core::{ClientId, InvoiceId, ScheduleEntryId};
use facturation_infra::{InMemoryClientDirectory, InMemoryInvoiceStore, InMemoryScheduleStore};
use facturation_invoicing::Invoice;
use facturation_planning::ScheduleEntry;

/// Storage adapters plus the billing engine wired on top of them.
pub struct AppServices {
    clients: Arc<InMemoryClientDirectory>,
    schedule: Arc<InMemoryScheduleStore>,
    invoices: Arc<InMemoryInvoiceStore>,
    billing: BillingEngine,
}

impl AppServices {
    pub fn in_memory(config: BillingConfig) -> Self {
        let clients = Arc::new(InMemoryClientDirectory::new());
        let schedule = Arc::new(InMemoryScheduleStore::new());
        let invoices = Arc::new(InMemoryInvoiceStore::new());
        let billing = BillingEngine::new(clients.clone(), schedule.clone(), invoices.clone(), config);
        Self {
            clients,
            schedule,
            invoices,
            billing,
        }
    }

    pub fn billing(&self) -> &BillingEngine {
        &self.billing
    }

    pub fn register_client(&self, client: Client) -> Result<ClientId, StorageError> {
        self.clients.register(client)
    }

    pub fn clients_list(&self) -> Result<Vec<Client>, StorageError> {
        self.clients.list()
    }

    pub fn clients_get(&self, id: ClientId) -> Result<Option<Client>, StorageError> {
        self.clients.find_client(id)
    }

    pub fn add_schedule_entry(&self, entry: ScheduleEntry) -> Result<ScheduleEntryId, StorageError> {
        self.schedule.insert(entry)
    }

    pub fn schedule_entry_get(&self, id: ScheduleEntryId) -> Result<Option<ScheduleEntry>, StorageError> {
        self.schedule.get(id)
    }

    pub fn invoices_list(&self) -> Result<Vec<Invoice>, StorageError> {
        self.invoices.list()
    }

    pub fn invoices_get(&self, id: InvoiceId) -> Result<Option<Invoice>, StorageError> {
        self.invoices.get(id)
    }
}
