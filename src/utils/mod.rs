//! Utility modules

pub mod memory_storage;
pub mod validation;

pub use memory_storage::MemoryStorage;
