//! `facturation-billing` — monthly billing aggregation engine.
//!
//! A billing run turns the schedule entries of one calendar month into per-client
//! totals and, when committed, into issued invoices:
//!
//! - [`period`]: the inclusive date range of a (month, year)
//! - [`classify`]: whether an entry is billable, and under which pricing mode
//! - [`pricing`]: HT / tax / TTC of one billable entry
//! - [`aggregator`]: per-client and grand totals
//! - [`grouping`]: identical prestations collapsed into invoice lines
//! - [`engine`]: preview / commit over the storage [`ports`]

pub mod aggregator;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod period;
pub mod ports;
pub mod pricing;
pub mod result;

pub use aggregator::{Aggregation, ClientAggregator, ClientBilling, Totals};
pub use classify::{Classification, PricingMode, SkipReason, classify};
pub use config::BillingConfig;
pub use engine::{BillingEngine, BillingRequest};
pub use error::{BillingError, BillingResult, StorageError};
pub use grouping::{LineGroup, group_prestations};
pub use period::{BillingPeriod, month_name};
pub use ports::{ClientDirectory, InvoiceRepository, ScheduleQuery, ScheduleStore};
pub use pricing::{PricedPrestation, price};
pub use result::{BillingRunResult, CreatedInvoice, FailedClient};
