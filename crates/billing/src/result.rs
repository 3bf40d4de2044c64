//! Outcome of a preview or commit run.

use serde::Serialize;

use facturation_core::{ClientId, InvoiceId};
use facturation_invoicing::InvoiceReference;

use crate::aggregator::{Aggregation, ClientBilling, Totals};
use crate::period::BillingPeriod;

/// An invoice written and issued by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedInvoice {
    pub client_id: ClientId,
    pub invoice_id: InvoiceId,
    pub reference: InvoiceReference,
}

/// A client whose invoice could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedClient {
    pub client_id: ClientId,
    pub client_name: String,
    pub error: String,
}

/// Outcome of a preview or commit.
///
/// Commit-only fields stay empty for previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingRunResult {
    pub month: u32,
    pub year: i32,
    pub month_name: &'static str,
    pub client_count: usize,
    pub prestation_count: usize,
    pub totals: Totals,
    pub clients: Vec<ClientBilling>,
    pub created_invoices: Vec<CreatedInvoice>,
    /// Clients that already had an issued invoice for the period.
    pub skipped_clients: Vec<ClientId>,
    pub failed_clients: Vec<FailedClient>,
}

impl BillingRunResult {
    pub fn new(period: &BillingPeriod, aggregation: Aggregation) -> Self {
        Self {
            month: period.month(),
            year: period.year(),
            month_name: period.month_name(),
            client_count: aggregation.clients.len(),
            prestation_count: aggregation.prestation_count,
            totals: aggregation.totals,
            clients: aggregation.clients,
            created_invoices: Vec::new(),
            skipped_clients: Vec::new(),
            failed_clients: Vec::new(),
        }
    }

    pub fn created_invoice_ids(&self) -> Vec<InvoiceId> {
        self.created_invoices.iter().map(|c| c.invoice_id).collect()
    }

    /// Every billed client was either invoiced now or already invoiced before.
    pub fn is_complete(&self) -> bool {
        self.failed_clients.is_empty()
            && self.created_invoices.len() + self.skipped_clients.len() == self.client_count
    }
}
