use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stops::PointGeometry;

/// `GET /get_favorites_count`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesCount {
    pub count: u64,
}

/// `GET /api/user_favorites`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserFavorites {
    #[serde(default)]
    pub features: Vec<FavoriteFeature>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FavoriteFeature {
    pub properties: FavoriteProperties,
    #[serde(default)]
    pub geometry: Option<PointGeometry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoriteProperties {
    pub atco: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub authority: Option<String>,
    #[serde(default)]
    pub lines: Option<String>,
}

/// `POST /toggle_favorite`
///
/// The backend stores the descriptive fields alongside the code so the
/// favorites page can render without the full stop feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub atco: String,
    pub name: String,
    pub street: String,
    pub locality: String,
    pub authority: String,
    pub lines: String,
    pub lat: f64,
    pub lng: f64,
}

/// What the backend decided a toggle did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteAction {
    Added,
    Removed,
}

impl fmt::Display for FavoriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FavoriteAction::Added => write!(f, "added"),
            FavoriteAction::Removed => write!(f, "removed"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToggleFavoriteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<FavoriteAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /remove_favorite`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveFavoriteRequest {
    pub atco_code: String,
}

/// Response shape shared by `/remove_favorite` and `/clear_all_favorites`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /check_favorite/:atco`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFavoriteResponse {
    pub is_favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_toggle_response() {
        let added: ToggleFavoriteResponse = serde_json::from_str(
            r#"{"success": true, "action": "added", "message": "Added to favorites"}"#,
        )
        .unwrap();
        assert!(added.success);
        assert_eq!(added.action, Some(FavoriteAction::Added));

        let failed: ToggleFavoriteResponse =
            serde_json::from_str(r#"{"success": false, "error": "No ATCO code provided"}"#)
                .unwrap();
        assert!(!failed.success);
        assert_eq!(failed.action, None);
        assert_eq!(failed.error.as_deref(), Some("No ATCO code provided"));
    }

    #[test]
    fn test_decode_user_favorites() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"atco": "0100BRP90123", "name": "Temple Meads", "is_favorite": true},
                "geometry": {"type": "Point", "coordinates": [-2.58, 51.45]}
            }]
        }"#;
        let favorites: UserFavorites = serde_json::from_str(json).unwrap();
        assert_eq!(favorites.features.len(), 1);
        assert_eq!(favorites.features[0].properties.atco, "0100BRP90123");
        assert_eq!(favorites.features[0].properties.street, None);
    }

    #[test]
    fn test_remove_request_field_name() {
        let body = serde_json::to_value(RemoveFavoriteRequest {
            atco_code: "0100BRP90123".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"atco_code": "0100BRP90123"}));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(FavoriteAction::Added.to_string(), "added");
        assert_eq!(FavoriteAction::Removed.to_string(), "removed");
    }
}
