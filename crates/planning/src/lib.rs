//! Planning domain module: scheduled service occurrences.
//!
//! Schedule entries are created and edited by the scheduling screens; the billing
//! engine only reads them. This crate holds their shape and the small pieces of
//! derivation (worked duration, label defaults) that billing relies on.

pub mod category;
pub mod entry;

pub use category::EventCategory;
pub use entry::{DEFAULT_SUBJECT, ScheduleEntry};
