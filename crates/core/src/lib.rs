//! `facturation-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model and the monetary value objects every
//! other crate computes with.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ClientId, InvoiceId, InvoiceLineId, ScheduleEntryId};
pub use money::{Money, TaxRate, div_round_half_up};
pub use value_object::ValueObject;
