//! Invoicing domain module.
//!
//! This crate contains the invoice records produced by billing runs and the rules
//! they obey while being written (draft → issued), implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod invoice;
pub mod reference;

pub use invoice::{
    Invoice, InvoiceLine, InvoicePeriod, InvoiceStatus, NewInvoice, NewInvoiceLine,
};
pub use reference::{DEFAULT_REFERENCE_PREFIX, InvoiceReference};
