use stop_explorer_transit::{StopIdentifier, TransitError};

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error(transparent)]
    Transit(#[from] TransitError),

    /// Error reported by the backend in a `{success: false}` body.
    #[error("{0}")]
    Backend(String),

    #[error("location permission denied")]
    GeolocationDenied,

    #[error("geolocation is not supported")]
    GeolocationUnsupported,

    #[error("a request for stop {0} is already in flight")]
    RequestInFlight(StopIdentifier),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ExplorerError {
    /// Transport-level failures, as opposed to errors the backend reported.
    pub fn is_network(&self) -> bool {
        matches!(self, ExplorerError::Network(_) | ExplorerError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
