//! Client directory domain module.
//!
//! This crate describes the billed parties (individuals and organisations) and how
//! they are named on invoices, implemented purely as domain logic (no IO, no HTTP,
//! no storage).

pub mod client;

pub use client::{Client, ClientKind, ContactInfo, UNKNOWN_CLIENT_LABEL};
