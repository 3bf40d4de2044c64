//! In-memory implementations of the billing storage ports.
//!
//! Intended for tests/dev and for running the HTTP service without a database.

pub mod clients;
pub mod invoices;
pub mod keyed_store;
pub mod schedule;

pub use clients::InMemoryClientDirectory;
pub use invoices::InMemoryInvoiceStore;
pub use keyed_store::InMemoryKeyedStore;
pub use schedule::InMemoryScheduleStore;
