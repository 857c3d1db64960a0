//! Map viewport: where the map looks and how far it is zoomed in.

use geo::{BoundingRect, MultiPoint, Point};
use serde::{Deserialize, Serialize};

use crate::config::ExplorerConfig;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Bristol city centre, the map's fallback center.
    pub const BRISTOL: LatLng = LatLng {
        lat: 51.455,
        lng: -2.587,
    };

    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    pub fn to_point(self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Viewport {
    Center { center: LatLng, zoom: u8 },
    Bounds { south_west: LatLng, north_east: LatLng },
}

impl Viewport {
    pub fn default_center(config: &ExplorerConfig) -> Self {
        Viewport::Center {
            center: config.default_center,
            zoom: config.default_zoom,
        }
    }

    /// Viewport from the `lat`/`lng` query parameters of the explorer page.
    ///
    /// Each coordinate falls back to the default center on its own. The
    /// closer zoom is used whenever `lat` is present.
    pub fn from_query(lat: Option<&str>, lng: Option<&str>, config: &ExplorerConfig) -> Self {
        let parse = |value: Option<&str>| {
            value
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };

        let center = LatLng::new(
            parse(lat).unwrap_or(config.default_center.lat),
            parse(lng).unwrap_or(config.default_center.lng),
        );
        let zoom = match lat {
            Some(lat) if !lat.is_empty() => config.focused_zoom,
            _ => config.default_zoom,
        };

        Viewport::Center { center, zoom }
    }

    /// Bounds around `points`, grown by `pad` times the span on every side.
    pub fn fit(points: impl IntoIterator<Item = Point>, pad: f64) -> Option<Self> {
        let rect = MultiPoint::from_iter(points).bounding_rect()?;
        let pad_x = rect.width() * pad;
        let pad_y = rect.height() * pad;

        Some(Viewport::Bounds {
            south_west: LatLng::new(rect.min().y - pad_y, rect.min().x - pad_x),
            north_east: LatLng::new(rect.max().y + pad_y, rect.max().x + pad_x),
        })
    }
}

/// Link to the explorer centered on a stop, as used by "view on map".
pub fn explorer_link(lat: f64, lng: f64) -> Option<String> {
    LatLng::new(lat, lng)
        .is_finite()
        .then(|| format!("/explorer?lat={lat}&lng={lng}"))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_query_without_params_uses_default() {
        let config = ExplorerConfig::default();
        assert_eq!(
            Viewport::from_query(None, None, &config),
            Viewport::Center {
                center: LatLng::BRISTOL,
                zoom: 12
            }
        );
    }

    #[test]
    fn test_query_with_lat_zooms_in() {
        let config = ExplorerConfig::default();
        let viewport = Viewport::from_query(Some("51.46"), Some("-2.6"), &config);
        assert_eq!(
            viewport,
            Viewport::Center {
                center: LatLng::new(51.46, -2.6),
                zoom: 15
            }
        );
    }

    #[test]
    fn test_unparsable_coordinate_falls_back_alone() {
        let config = ExplorerConfig::default();
        let Viewport::Center { center, zoom } =
            Viewport::from_query(Some("51.46"), Some("west"), &config)
        else {
            panic!("expected a centered viewport");
        };
        assert_eq!(center, LatLng::new(51.46, LatLng::BRISTOL.lng));
        assert_eq!(zoom, 15);
    }

    #[test]
    fn test_fit_pads_bounds() {
        let points = vec![Point::new(-2.6, 51.4), Point::new(-2.5, 51.5)];
        let Some(Viewport::Bounds {
            south_west,
            north_east,
        }) = Viewport::fit(points, 0.2)
        else {
            panic!("expected bounds");
        };

        assert_abs_diff_eq!(south_west.lat, 51.38, epsilon = 1e-9);
        assert_abs_diff_eq!(south_west.lng, -2.62, epsilon = 1e-9);
        assert_abs_diff_eq!(north_east.lat, 51.52, epsilon = 1e-9);
        assert_abs_diff_eq!(north_east.lng, -2.48, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_without_points() {
        assert_eq!(Viewport::fit(Vec::<Point>::new(), 0.2), None);
    }

    #[test]
    fn test_explorer_link() {
        assert_eq!(
            explorer_link(51.4496, -2.5806).as_deref(),
            Some("/explorer?lat=51.4496&lng=-2.5806")
        );
        assert_eq!(explorer_link(f64::NAN, -2.5), None);
    }
}
