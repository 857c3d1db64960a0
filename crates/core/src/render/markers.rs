use std::collections::{BTreeSet, HashMap, HashSet};

use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use stop_explorer_transit::{StopIdentifier, StopView};

use super::{Projection, RenderAdapter, ViewKind, or_na};
use crate::viewport::LatLng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MarkerIcon {
    Stop,
    FavoriteStop,
    User,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: StopIdentifier,
    pub position: Point,
    pub icon: MarkerIcon,
    pub tooltip: String,
    pub popup: String,
    pub visible: bool,
}

impl Marker {
    fn for_stop(view: &StopView<'_>) -> Self {
        let record = view.record;
        Self {
            id: record.id().clone(),
            position: record.position(),
            icon: icon_for(view.is_favorite),
            tooltip: format!("{}\n{}", record.name(), record.street()),
            popup: popup_text(view),
            visible: true,
        }
    }
}

fn icon_for(is_favorite: bool) -> MarkerIcon {
    if is_favorite {
        MarkerIcon::FavoriteStop
    } else {
        MarkerIcon::Stop
    }
}

fn popup_text(view: &StopView<'_>) -> String {
    let record = view.record;
    let name = if record.name().is_empty() {
        "Unknown Stop"
    } else {
        record.name()
    };
    let action = if view.is_favorite {
        "Remove from Favorites"
    } else {
        "Add to Favorites"
    };

    format!(
        "{name}\nStreet: {}\nLocality: {}\nAuthority: {}\nLines: {}\nATCO Code: {}\n[{action}]",
        or_na(record.street()),
        or_na(record.locality()),
        or_na(record.authority().as_str()),
        or_na(record.lines()),
        or_na(record.id().as_str()),
    )
}

/// Map markers, one per stop, plus an optional "you are here" marker.
///
/// Markers are created the first time a stop is projected and then only
/// shown, hidden, or re-iconed.
#[derive(Clone, Debug, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    index: HashMap<StopIdentifier, usize>,
    user: Option<LatLng>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &StopIdentifier) -> Option<&Marker> {
        self.index.get(id).map(|&i| &self.markers[i])
    }

    /// Every marker ever created, shown or not.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn user_location(&self) -> Option<LatLng> {
        self.user
    }

    pub fn visible_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|marker| marker.visible)
    }

    /// Visible markers as GeoJSON, the user marker last.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut features: Vec<Feature> = self.visible_markers().map(marker_feature).collect();

        if let Some(user) = self.user {
            let mut properties = JsonObject::new();
            properties.insert("icon".to_string(), serde_json::json!(MarkerIcon::User.as_ref()));
            properties.insert("popup".to_string(), serde_json::json!("You are here"));
            features.push(point_feature(user.to_point(), properties));
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn marker_feature(marker: &Marker) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("atco".to_string(), serde_json::json!(marker.id.as_str()));
    properties.insert("icon".to_string(), serde_json::json!(marker.icon.as_ref()));
    properties.insert(
        "is_favorite".to_string(),
        serde_json::json!(marker.icon == MarkerIcon::FavoriteStop),
    );
    properties.insert("tooltip".to_string(), serde_json::json!(marker.tooltip));
    properties.insert("popup".to_string(), serde_json::json!(marker.popup));
    point_feature(marker.position, properties)
}

fn point_feature(position: Point, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![position.x(), position.y()]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

impl RenderAdapter for MarkerLayer {
    fn view(&self) -> ViewKind {
        ViewKind::Map
    }

    fn apply(&mut self, projection: &Projection<'_>) {
        let mut shown = HashSet::with_capacity(projection.stops.len());

        for view in &projection.stops {
            match self.index.get(view.id()) {
                Some(&i) => {
                    let marker = &mut self.markers[i];
                    let icon = icon_for(view.is_favorite);
                    if marker.icon != icon {
                        marker.icon = icon;
                        marker.popup = popup_text(view);
                    }
                }
                None => {
                    self.index.insert(view.id().clone(), self.markers.len());
                    self.markers.push(Marker::for_stop(view));
                }
            }
            shown.insert(view.id().clone());
        }

        for marker in &mut self.markers {
            marker.visible = shown.contains(&marker.id);
        }
        self.user = projection.user_location;
    }

    fn visible(&self) -> BTreeSet<StopIdentifier> {
        self.visible_markers().map(|marker| marker.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use stop_explorer_transit::{StopDetails, StopRecord};

    use super::*;

    fn stops() -> Vec<StopRecord> {
        ["a", "b", "c"]
            .iter()
            .map(|code| {
                StopRecord::new(
                    *code,
                    StopDetails {
                        name: format!("Stop {code}"),
                        ..Default::default()
                    },
                    Point::new(-2.58, 51.45),
                )
            })
            .collect()
    }

    fn projection<'a>(stops: &'a [StopRecord], favorite: &[&str]) -> Projection<'a> {
        let stops: Vec<_> = stops
            .iter()
            .map(|record| StopView {
                record,
                is_favorite: favorite.contains(&record.id().as_str()),
            })
            .collect();
        Projection {
            all: stops.clone(),
            stops,
            user_location: None,
        }
    }

    #[test]
    fn test_apply_hides_unprojected_markers() {
        let stops = stops();
        let mut layer = MarkerLayer::new();
        layer.apply(&projection(&stops, &[]));
        assert_eq!(layer.visible().len(), 3);

        layer.apply(&projection(&stops[1..2], &[]));
        let visible: Vec<_> = layer.visible().into_iter().map(|id| id.to_string()).collect();
        assert_eq!(visible, vec!["b"]);
        // hidden, not dropped
        assert_eq!(layer.len(), 3);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let stops = stops();
        let mut layer = MarkerLayer::new();
        let subset = projection(&stops[..2], &["a"]);

        layer.apply(&subset);
        let once = layer.visible();
        let markers_once: Vec<_> = layer.visible_markers().cloned().collect();

        layer.apply(&subset);
        assert_eq!(layer.visible(), once);
        assert_eq!(layer.visible_markers().cloned().collect::<Vec<_>>(), markers_once);
    }

    #[test]
    fn test_favorite_flag_switches_icon() {
        let stops = stops();
        let mut layer = MarkerLayer::new();
        layer.apply(&projection(&stops, &[]));

        let id = StopIdentifier::new("b");
        assert_eq!(layer.get(&id).unwrap().icon, MarkerIcon::Stop);

        layer.apply(&projection(&stops, &["b"]));
        let marker = layer.get(&id).unwrap();
        assert_eq!(marker.icon, MarkerIcon::FavoriteStop);
        assert!(marker.popup.ends_with("[Remove from Favorites]"));
    }

    #[test]
    fn test_popup_shows_na_for_missing_fields() {
        let stops = stops();
        let mut layer = MarkerLayer::new();
        layer.apply(&projection(&stops, &[]));

        let popup = &layer.get(&StopIdentifier::new("a")).unwrap().popup;
        assert!(popup.starts_with("Stop a\nStreet: N/A\n"));
    }

    #[test]
    fn test_geojson_export_includes_user_marker() {
        let stops = stops();
        let mut layer = MarkerLayer::new();
        let mut nearest = projection(&stops[..1], &[]);
        nearest.user_location = Some(LatLng::new(51.455, -2.587));
        layer.apply(&nearest);

        let collection = layer.to_feature_collection();
        assert_eq!(collection.features.len(), 2);

        let user = collection.features[1].properties.as_ref().unwrap();
        assert_eq!(user["icon"], serde_json::json!("user"));

        let stop = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(stop["atco"], serde_json::json!("a"));
        assert_eq!(stop["icon"], serde_json::json!("stop"));
    }
}
