//! Preview and commit of monthly billing runs.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use tracing::{debug, info, warn};

use facturation_clients::UNKNOWN_CLIENT_LABEL;
use facturation_core::ClientId;
use facturation_invoicing::NewInvoice;

use crate::aggregator::{Aggregation, ClientAggregator, ClientBilling};
use crate::classify::{Classification, classify};
use crate::config::BillingConfig;
use crate::error::{BillingError, BillingResult, StorageError};
use crate::grouping::group_prestations;
use crate::period::BillingPeriod;
use crate::ports::{ClientDirectory, InvoiceRepository, ScheduleQuery, ScheduleStore};
use crate::pricing::price;
use crate::result::{BillingRunResult, CreatedInvoice, FailedClient};

/// Parameters of one billing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingRequest {
    pub month: u32,
    pub year: i32,
    /// Only bill these clients; `None` or an empty list bills everyone.
    pub client_ids: Option<Vec<ClientId>>,
}

impl BillingRequest {
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            client_ids: None,
        }
    }

    pub fn for_clients(mut self, client_ids: Vec<ClientId>) -> Self {
        self.client_ids = Some(client_ids);
        self
    }
}

/// Billing engine wired to its storage collaborators.
pub struct BillingEngine {
    clients: Arc<dyn ClientDirectory>,
    schedule: Arc<dyn ScheduleStore>,
    invoices: Arc<dyn InvoiceRepository>,
    config: BillingConfig,
    committing: Mutex<HashSet<(i32, u32)>>,
}

impl BillingEngine {
    pub fn new(
        clients: Arc<dyn ClientDirectory>,
        schedule: Arc<dyn ScheduleStore>,
        invoices: Arc<dyn InvoiceRepository>,
        config: BillingConfig,
    ) -> Self {
        Self {
            clients,
            schedule,
            invoices,
            config,
            committing: Mutex::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Aggregate a period without writing anything.
    #[tracing::instrument(skip_all, fields(month = request.month, year = request.year))]
    pub fn preview(&self, request: &BillingRequest) -> BillingResult<BillingRunResult> {
        let period = BillingPeriod::new(request.month, request.year, &self.config)?;
        let aggregation = self.aggregate(&period, request.client_ids.as_deref())?;
        let result = BillingRunResult::new(&period, aggregation);
        info!(
            clients = result.client_count,
            prestations = result.prestation_count,
            total_ht = %result.totals.ht,
            "billing preview computed"
        );
        Ok(result)
    }

    /// Aggregate a period and write one issued invoice per billed client.
    ///
    /// Clients already invoiced for the period are skipped. A client whose invoice
    /// cannot be written is reported in `failed_clients`; the run goes on.
    #[tracing::instrument(skip_all, fields(month = request.month, year = request.year))]
    pub fn commit(
        &self,
        request: &BillingRequest,
        issued_at: DateTime<Utc>,
    ) -> BillingResult<BillingRunResult> {
        let period = BillingPeriod::new(request.month, request.year, &self.config)?;
        let _guard = CommitGuard::acquire(&self.committing, &period)?;

        let aggregation = self.aggregate(&period, request.client_ids.as_deref())?;
        let mut result = BillingRunResult::new(&period, aggregation);
        let issue_date = issued_at.date_naive();

        let mut created = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();
        for client in result.clients.iter().filter(|c| !c.prestations.is_empty()) {
            match self.invoice_client(&period, client, issue_date) {
                Ok(Some(invoice)) => created.push(invoice),
                Ok(None) => skipped.push(client.client_id),
                Err(e) => {
                    warn!(client_id = %client.client_id, error = %e, "client invoice not written");
                    failed.push(FailedClient {
                        client_id: client.client_id,
                        client_name: client.client_name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        result.created_invoices = created;
        result.skipped_clients = skipped;
        result.failed_clients = failed;

        info!(
            clients = result.client_count,
            created = result.created_invoices.len(),
            skipped = result.skipped_clients.len(),
            failed = result.failed_clients.len(),
            "billing commit finished"
        );
        Ok(result)
    }

    fn aggregate(
        &self,
        period: &BillingPeriod,
        client_ids: Option<&[ClientId]>,
    ) -> BillingResult<Aggregation> {
        let query = ScheduleQuery {
            from: period.first_day(),
            to: period.last_day(),
            categories: self.config.eligible_categories.clone(),
            client_ids: client_ids
                .filter(|ids| !ids.is_empty())
                .map(<[ClientId]>::to_vec),
        };
        let entries = self.schedule.find_billable_candidates(&query)?;

        let mut aggregator = ClientAggregator::new();
        for entry in &entries {
            let Some(client_id) = entry.billed_client() else {
                debug!(entry_id = %entry.id, "schedule entry skipped: no client");
                continue;
            };
            let (mode, minutes) = match classify(entry, &self.config) {
                Classification::Billable {
                    mode,
                    duration_minutes,
                } => (mode, duration_minutes),
                Classification::Skip(reason) => {
                    debug!(entry_id = %entry.id, %reason, "schedule entry skipped");
                    continue;
                }
            };
            let prestation = price(entry, mode, minutes, self.config.tax_rate)?;
            aggregator.record(client_id, prestation, |id| {
                self.client_name(id).map_err(BillingError::from)
            })?;
        }
        Ok(aggregator.finish())
    }

    fn client_name(&self, id: ClientId) -> Result<String, StorageError> {
        Ok(match self.clients.find_client(id)? {
            Some(client) => client.display_name(),
            None => UNKNOWN_CLIENT_LABEL.to_string(),
        })
    }

    /// `Ok(None)` when the client already has an issued invoice for the period.
    fn invoice_client(
        &self,
        period: &BillingPeriod,
        client: &ClientBilling,
        issue_date: NaiveDate,
    ) -> Result<Option<CreatedInvoice>, StorageError> {
        if let Some(existing) = self
            .invoices
            .find_for_client_period(client.client_id, period.invoice_period())?
        {
            if existing.is_issued() {
                info!(client_id = %client.client_id, reference = %existing.reference, "client already invoiced");
                return Ok(None);
            }
            warn!(invoice_id = %existing.id, "discarding draft left by an interrupted commit");
            self.invoices.discard_invoice(existing.id)?;
        }

        let groups = group_prestations(&client.prestations)?;
        let due_date = issue_date
            .checked_add_days(Days::new(u64::from(self.config.payment_terms_days)))
            .ok_or_else(|| StorageError::Rejected("due date out of range".to_string()))?;
        let reference = self
            .invoices
            .next_reference(&self.config.reference_prefix, issue_date.year())?;
        let invoice_id = self.invoices.create_invoice(NewInvoice {
            reference: reference.clone(),
            client_id: client.client_id,
            period: period.invoice_period(),
            issue_date,
            due_date,
            payment_terms: self.config.payment_terms(),
            subject: period.invoice_subject(),
            subtotal_ht: client.totals.ht,
            total_tax: client.totals.tax,
            total_ttc: client.totals.ttc,
        })?;

        let written = groups
            .iter()
            .try_for_each(|group| {
                self.invoices
                    .add_line(invoice_id, group.to_invoice_line(self.config.tax_rate))
                    .map(|_| ())
            })
            .and_then(|()| self.invoices.issue_invoice(invoice_id));

        if let Err(e) = written {
            if let Err(discard) = self.invoices.discard_invoice(invoice_id) {
                warn!(%invoice_id, error = %discard, "partial invoice could not be discarded");
            }
            return Err(e);
        }

        debug!(client_id = %client.client_id, %reference, "invoice issued");
        Ok(Some(CreatedInvoice {
            client_id: client.client_id,
            invoice_id,
            reference,
        }))
    }
}

impl core::fmt::Debug for BillingEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BillingEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Marks a period as being committed until dropped.
struct CommitGuard<'a> {
    committing: &'a Mutex<HashSet<(i32, u32)>>,
    key: (i32, u32),
}

impl<'a> CommitGuard<'a> {
    fn acquire(
        committing: &'a Mutex<HashSet<(i32, u32)>>,
        period: &BillingPeriod,
    ) -> BillingResult<Self> {
        let key = (period.year(), period.month());
        let mut running = committing.lock().unwrap_or_else(PoisonError::into_inner);
        if !running.insert(key) {
            return Err(BillingError::CommitInProgress {
                month: period.month(),
                year: period.year(),
            });
        }
        Ok(Self { committing, key })
    }
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        self.committing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
