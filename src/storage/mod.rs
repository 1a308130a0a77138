//! Storage implementations for shipping reference data

pub mod in_memory;

pub use in_memory::{InMemoryLocationService, InMemoryShippingCatalog};
