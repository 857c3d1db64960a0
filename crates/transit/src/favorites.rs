//! The signed-in user's favorite stops.
//!
//! The backend is authoritative: this set only changes after the backend has
//! acknowledged a mutation, so there is never an optimistic update to roll
//! back.

use std::collections::HashSet;

use api_types::{FavoriteAction, UserFavorites};

use crate::identifiers::*;
use crate::models::StopRecord;

/// A stop joined with its favorite status at read time.
///
/// Renderers only ever see this pairing, so the map icon and the table star
/// come from the same lookup.
#[derive(Clone, Copy, Debug)]
pub struct StopView<'a> {
    pub record: &'a StopRecord,
    pub is_favorite: bool,
}

impl StopView<'_> {
    pub fn id(&self) -> &StopIdentifier {
        self.record.id()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FavoriteState {
    ids: HashSet<StopIdentifier>,
}

impl FavoriteState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set from the two-step fetch.
    ///
    /// A zero `count` means the list was never requested, so whatever is
    /// passed for it is ignored.
    pub fn hydrate(count: u64, list: Option<&UserFavorites>) -> Self {
        if count == 0 {
            return Self::new();
        }

        let ids = list
            .map(|favorites| {
                favorites
                    .features
                    .iter()
                    .map(|feature| StopIdentifier::new(&feature.properties.atco))
                    .collect()
            })
            .unwrap_or_default();

        Self { ids }
    }

    pub fn contains(&self, id: &StopIdentifier) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StopIdentifier> {
        self.ids.iter()
    }

    /// Apply the action the backend reported for a toggle.
    pub fn apply(&mut self, id: StopIdentifier, action: FavoriteAction) {
        match action {
            FavoriteAction::Added => {
                self.ids.insert(id);
            }
            FavoriteAction::Removed => {
                self.ids.remove(&id);
            }
        }
    }

    /// Drop one favorite after the backend confirmed its removal.
    pub fn remove(&mut self, id: &StopIdentifier) -> bool {
        self.ids.remove(id)
    }

    /// Empty the set after the backend confirmed; returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.ids.len();
        self.ids.clear();
        removed
    }

    pub fn annotate<'a, I>(&self, records: I) -> Vec<StopView<'a>>
    where
        I: IntoIterator<Item = &'a StopRecord>,
    {
        records
            .into_iter()
            .map(|record| StopView {
                record,
                is_favorite: self.contains(record.id()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use api_types::{FavoriteFeature, FavoriteProperties};
    use geo::Point;

    use super::*;
    use crate::models::StopDetails;

    fn favorites(codes: &[&str]) -> UserFavorites {
        UserFavorites {
            features: codes
                .iter()
                .map(|code| FavoriteFeature {
                    properties: FavoriteProperties {
                        atco: code.to_string(),
                        ..Default::default()
                    },
                    geometry: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_hydrate_skips_list_when_count_is_zero() {
        let list = favorites(&["0100BRP90123"]);
        assert!(FavoriteState::hydrate(0, Some(&list)).is_empty());
        assert!(FavoriteState::hydrate(0, None).is_empty());
    }

    #[test]
    fn test_hydrate_from_list() {
        let list = favorites(&["0100BRP90123", "0100BRP90124"]);
        let state = FavoriteState::hydrate(2, Some(&list));
        assert_eq!(state.len(), 2);
        assert!(state.contains(&StopIdentifier::new("0100BRP90124")));
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let list = favorites(&["keep"]);
        let mut state = FavoriteState::hydrate(1, Some(&list));
        let before = state.clone();

        let id = StopIdentifier::new("0100BRP90123");
        state.apply(id.clone(), FavoriteAction::Added);
        assert!(state.contains(&id));
        state.apply(id.clone(), FavoriteAction::Removed);

        assert_eq!(state, before);
    }

    #[test]
    fn test_clear_all_reports_count() {
        let list = favorites(&["a", "b", "c"]);
        let mut state = FavoriteState::hydrate(3, Some(&list));
        assert_eq!(state.clear_all(), 3);
        assert!(state.is_empty());
        assert_eq!(state.clear_all(), 0);
    }

    #[test]
    fn test_annotate_reads_membership() {
        let records = vec![
            StopRecord::new("fav", StopDetails::default(), Point::new(-2.5, 51.4)),
            StopRecord::new("plain", StopDetails::default(), Point::new(-2.5, 51.4)),
        ];
        let list = favorites(&["fav"]);
        let state = FavoriteState::hydrate(1, Some(&list));

        let views = state.annotate(&records);
        assert!(views[0].is_favorite);
        assert!(!views[1].is_favorite);
    }
}
