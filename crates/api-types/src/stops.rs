use serde::{Deserialize, Serialize};

/// `GET /api/busstops`
///
/// `features` stays optional so a payload without it can be told apart from
/// an empty collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BusStopFeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<BusStopFeature>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BusStopFeature {
    #[serde(default)]
    pub geometry: Option<PointGeometry>,
    #[serde(default)]
    pub properties: BusStopProperties,
}

/// GeoJSON point geometry, `[lng, lat]` order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl PointGeometry {
    pub fn from_lng_lat(lng: f64, lat: f64) -> Self {
        Self {
            coordinates: vec![lng, lat],
        }
    }

    /// Returns `(lng, lat)` when both coordinates are present and finite.
    pub fn lng_lat(&self) -> Option<(f64, f64)> {
        match self.coordinates.as_slice() {
            [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Some((*lng, *lat)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BusStopProperties {
    #[serde(rename = "ATCO_CODE", default)]
    pub atco_code: Option<String>,
    #[serde(rename = "NAME_INDICATOR", default)]
    pub name_indicator: Option<String>,
    #[serde(rename = "STREET_NAME", default)]
    pub street_name: Option<String>,
    #[serde(rename = "LOCALITY_NAME2", default)]
    pub locality_name: Option<String>,
    #[serde(rename = "LOCAL_AUTHORITY", default)]
    pub local_authority: Option<String>,
    #[serde(rename = "LINE_DIR_LIST", default)]
    pub line_dir_list: Option<String>,
}
