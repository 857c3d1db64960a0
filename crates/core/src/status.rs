use std::fmt;

/// The one-line status shown under the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    StopsLoaded(usize),
    LoadFailed,
    Filtered,
    AuthorityFilterApplied,
    ShowingAll,
    FavoriteAdded,
    FavoriteRemoved,
    FavoritesCleared(usize),
    Error(String),
    NetworkError,
    Locating,
    ShowingNearest(usize),
    LocationFallback,
    GeolocationUnsupported,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::StopsLoaded(count) => write!(f, "{count} stops loaded"),
            StatusMessage::LoadFailed => write!(f, "Error loading bus stops"),
            StatusMessage::Filtered => write!(f, "Filtered results"),
            StatusMessage::AuthorityFilterApplied => write!(f, "Authority filter applied"),
            StatusMessage::ShowingAll => write!(f, "Showing all stops"),
            StatusMessage::FavoriteAdded => write!(f, "Added to favorites!"),
            StatusMessage::FavoriteRemoved => write!(f, "Removed from favorites"),
            StatusMessage::FavoritesCleared(count) => write!(f, "Removed {count} favorites"),
            StatusMessage::Error(message) => write!(f, "Error: {message}"),
            StatusMessage::NetworkError => write!(f, "Network error. Please try again."),
            StatusMessage::Locating => write!(f, "Getting your location..."),
            StatusMessage::ShowingNearest(count) => {
                write!(f, "Showing the {count} nearest bus stops to you")
            }
            StatusMessage::LocationFallback => {
                write!(f, "Could not get your location. Using Bristol center.")
            }
            StatusMessage::GeolocationUnsupported => {
                write!(f, "Geolocation not supported by your browser")
            }
        }
    }
}
