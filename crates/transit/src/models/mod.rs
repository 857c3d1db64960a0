//! Stop data models, types, and errors.

pub mod types;

// Re-exports for convenience
pub use types::{Result, SearchText, StopDetails, StopRecord, TransitError};
