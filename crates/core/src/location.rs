//! Where the user is, for the nearest-stops view.

use std::future::Future;
use std::pin::Pin;

use crate::error::{ExplorerError, Result};
use crate::viewport::LatLng;

/// Asks the platform for the user's current position.
pub trait LocationSource: Send + Sync {
    fn current_position<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<LatLng>> + Send + 'a>>;
}

/// A position supplied up front, e.g. from command line flags.
#[derive(Clone, Copy, Debug)]
pub struct FixedLocation(pub LatLng);

impl LocationSource for FixedLocation {
    fn current_position<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<LatLng>> + Send + 'a>> {
        let position = self.0;
        Box::pin(async move { Ok(position) })
    }
}

/// A platform without geolocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unsupported;

impl LocationSource for Unsupported {
    fn current_position<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<LatLng>> + Send + 'a>> {
        Box::pin(async { Err(ExplorerError::GeolocationUnsupported) })
    }
}
