//! Core data types for stop data.

use std::sync::Arc;

use api_types::ToggleFavoriteRequest;
use geo::Point;

use crate::identifiers::*;

// ============================================================================
// Data Structures
// ============================================================================

/// Descriptive text of a stop as delivered by the feed.
///
/// Missing values are empty strings; display layers decide how to show them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StopDetails {
    pub name: String,
    pub street: String,
    pub locality: String,
    pub authority: String,
    pub lines: String,
}

/// A single bus stop.
///
/// Records are immutable after construction: the lowercase search text is
/// computed once in [`StopRecord::new`] and never refreshed, so no field is
/// exposed mutably. Favorite status is not stored here, see
/// [`crate::favorites::FavoriteState::annotate`].
#[derive(Clone, Debug, PartialEq)]
pub struct StopRecord {
    id: StopIdentifier,
    name: Arc<str>,
    street: Arc<str>,
    locality: Arc<str>,
    authority: AuthorityName,
    lines: Arc<str>,
    position: Point,
    search: SearchText,
}

impl StopRecord {
    /// `position` is `x = longitude, y = latitude`, in degrees.
    pub fn new(id: impl Into<StopIdentifier>, details: StopDetails, position: Point) -> Self {
        let id = id.into();
        let search = SearchText::new(&id, &details);

        Self {
            id,
            name: details.name.into(),
            street: details.street.into(),
            locality: details.locality.into(),
            authority: AuthorityName::new(details.authority),
            lines: details.lines.into(),
            position,
            search,
        }
    }

    pub fn id(&self) -> &StopIdentifier {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn locality(&self) -> &str {
        &self.locality
    }

    pub fn authority(&self) -> &AuthorityName {
        &self.authority
    }

    pub fn lines(&self) -> &str {
        &self.lines
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn latitude(&self) -> f64 {
        self.position.y()
    }

    pub fn longitude(&self) -> f64 {
        self.position.x()
    }

    pub fn search_text(&self) -> &SearchText {
        &self.search
    }

    /// Body sent to `/toggle_favorite`; the backend keeps these fields so the
    /// favorites page can be rendered without the stop feed.
    pub fn toggle_request(&self) -> ToggleFavoriteRequest {
        ToggleFavoriteRequest {
            atco: self.id.to_string(),
            name: self.name.to_string(),
            street: self.street.to_string(),
            locality: self.locality.to_string(),
            authority: self.authority.to_string(),
            lines: self.lines.to_string(),
            lat: self.latitude(),
            lng: self.longitude(),
        }
    }
}

/// Lowercased copies of the searchable fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchText {
    name: String,
    street: String,
    locality: String,
    authority: String,
    lines: String,
    code: String,
}

impl SearchText {
    fn new(id: &StopIdentifier, details: &StopDetails) -> Self {
        Self {
            name: details.name.to_lowercase(),
            street: details.street.to_lowercase(),
            locality: details.locality.to_lowercase(),
            authority: details.authority.to_lowercase(),
            lines: details.lines.to_lowercase(),
            code: id.as_str().to_lowercase(),
        }
    }

    /// `needle` must already be lowercase. The ATCO code is only searched
    /// when `include_code` is set.
    pub fn contains(&self, needle: &str, include_code: bool) -> bool {
        self.name.contains(needle)
            || self.street.contains(needle)
            || self.locality.contains(needle)
            || self.authority.contains(needle)
            || self.lines.contains(needle)
            || (include_code && self.code.contains(needle))
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Malformed stop feed: {0}")]
    Feed(String),

    #[error("Stop not found: {0}")]
    StopNotFound(StopIdentifier),
}

pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn temple_meads() -> StopRecord {
        StopRecord::new(
            "0100BRP90123",
            StopDetails {
                name: "Temple Meads Stn".into(),
                street: "Station Approach".into(),
                locality: "Bristol City Centre".into(),
                authority: "Bristol".into(),
                lines: "8 9 72 X1".into(),
            },
            Point::new(-2.5806, 51.4496),
        )
    }

    #[test]
    fn test_search_text_is_lowercase() {
        let stop = temple_meads();
        assert!(stop.search_text().contains("temple", false));
        assert!(stop.search_text().contains("x1", false));
        assert!(!stop.search_text().contains("Temple", false));
    }

    #[test]
    fn test_code_only_searched_when_requested() {
        let stop = temple_meads();
        assert!(!stop.search_text().contains("brp90123", false));
        assert!(stop.search_text().contains("brp90123", true));
    }

    #[test]
    fn test_toggle_request_carries_position() {
        let request = temple_meads().toggle_request();
        assert_eq!(request.atco, "0100BRP90123");
        assert_eq!(request.authority, "Bristol");
        assert_eq!(request.lat, 51.4496);
        assert_eq!(request.lng, -2.5806);
    }
}
