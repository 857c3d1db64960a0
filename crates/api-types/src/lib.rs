//! Wire types for the bus stop backend.
//!
//! Every endpoint the explorer talks to is described here as plain serde
//! structs, so both the HTTP client and test servers agree on the payloads.

pub mod favorites;
pub mod stops;

pub use favorites::{
    CheckFavoriteResponse, FavoriteAction, FavoriteFeature, FavoriteProperties, FavoritesCount,
    MutationResponse, RemoveFavoriteRequest, ToggleFavoriteRequest, ToggleFavoriteResponse,
    UserFavorites,
};
pub use stops::{BusStopFeature, BusStopFeed, BusStopProperties, PointGeometry};

/// Header carrying the CSRF token on mutating requests.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Endpoint paths, relative to the backend base URL.
pub mod endpoints {
    pub const BUS_STOPS: &str = "api/busstops";
    pub const FAVORITES_COUNT: &str = "get_favorites_count";
    pub const USER_FAVORITES: &str = "api/user_favorites";
    pub const TOGGLE_FAVORITE: &str = "toggle_favorite";
    pub const REMOVE_FAVORITE: &str = "remove_favorite";
    pub const CLEAR_ALL_FAVORITES: &str = "clear_all_favorites";
    /// Followed by a single path segment holding the ATCO code.
    pub const CHECK_FAVORITE: &str = "check_favorite";
}
