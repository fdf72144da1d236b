//! Storage abstraction for the reconciliation core.
//!
//! The domain layer only ever sees the traits in [`traits`]; the
//! [`memory`] module provides the in-memory backend used for development
//! and tests.

pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use memory::MemoryConnection;
pub use traits::{Connection, RegisterStorage, StatusFetcher};
