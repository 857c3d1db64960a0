//! Distance and nearest-stop queries.

pub mod queries;

pub use queries::{haversine_distance, nearest_k, EARTH_RADIUS_M};
