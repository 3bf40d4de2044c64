//! Infrastructure layer: storage adapters and configuration loading.

pub mod config;
pub mod memory;


pub use config::{AppConfig, ConfigError};
pub use memory::{
    InMemoryClientDirectory, InMemoryInvoiceStore, InMemoryKeyedStore, InMemoryScheduleStore,
};
