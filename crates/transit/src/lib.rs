//! # stop-explorer-transit
//!
//! The in-memory stop dataset behind the explorer's map and table views.
//!
//! ## Features
//!
//! - **StopStore**: stops loaded once from the backend feed, capped to a maximum count
//! - **FavoriteState**: the user's favorite stops, changed only on backend acknowledgement
//! - **Projections**: text, authority and nearest-K filters over the store
//! - **Spatial queries**: haversine distances on a spherical Earth
//!
//! ## Example
//!
//! ```
//! use stop_explorer_transit::prelude::*;
//! use geo::Point;
//!
//! let stop = StopRecord::new(
//!     "0100BRP90123",
//!     StopDetails {
//!         name: "Temple Meads".into(),
//!         authority: "Bristol".into(),
//!         ..Default::default()
//!     },
//!     Point::new(-2.5806, 51.4496),
//! );
//! let store = StopStore::from_records(vec![stop]);
//!
//! let nearby = project(
//!     store.records(),
//!     &Filter::NearestK { origin: Point::new(-2.587, 51.455), k: 5 },
//! );
//! assert_eq!(nearby.len(), 1);
//! ```

pub mod favorites;
pub mod identifiers;
pub mod models;
pub mod projection;
pub mod spatial;
pub mod store;

// Re-exports for convenience
pub mod prelude {
    pub use crate::favorites::{FavoriteState, StopView};
    pub use crate::identifiers::*;
    pub use crate::models::types::*;
    pub use crate::projection::{project, Filter};
    pub use crate::spatial::{haversine_distance, nearest_k};
    pub use crate::store::{StopStore, DEFAULT_MAX_STOPS};
    pub use api_types::FavoriteAction;
}

pub use prelude::*;
