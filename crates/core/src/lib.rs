//! Explorer session logic for the bus-stop map and table.
//!
//! [`ExplorerSession`] owns the stop store and the favorite set, talks to the
//! backend through [`StopBackend`] and pushes projections into render
//! adapters.

pub mod backend;
pub mod config;
pub mod error;
pub mod inflight;
pub mod location;
pub mod render;
pub mod session;
pub mod status;
pub mod viewport;

// Re-export transit from the transit crate
pub use stop_explorer_transit as transit;

pub use backend::{HttpBackend, StopBackend};
pub use config::ExplorerConfig;
pub use error::{ExplorerError, Result};
pub use location::{FixedLocation, LocationSource, Unsupported};
pub use session::{ExplorerSession, NearestOutcome, NearestStop};
pub use status::StatusMessage;
pub use viewport::{LatLng, Viewport, explorer_link};
