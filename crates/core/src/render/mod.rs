//! Render adapters.
//!
//! The map and the table each keep their own filter, so each is handed the
//! [`Projection`] for its [`ViewKind`] and reconciles it against what it
//! already shows. Elements are keyed by stop identifier, never by position in
//! a list, and favorite appearance is read from each [`StopView`], so the two
//! views cannot disagree about a stop.

pub mod markers;
pub mod table;

use std::collections::BTreeSet;

use stop_explorer_transit::{StopIdentifier, StopView};

use crate::viewport::LatLng;

pub use markers::{Marker, MarkerIcon, MarkerLayer};
pub use table::{TableRow, TableView};

/// Which of the two views an adapter draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Map,
    Table,
}

/// The stops a view should show right now, favorites already joined in.
#[derive(Clone, Debug, Default)]
pub struct Projection<'a> {
    /// Every loaded stop in load order.
    pub all: Vec<StopView<'a>>,
    /// The stops to show, in projection order.
    pub stops: Vec<StopView<'a>>,
    /// The user's own position, drawn separately from the stops.
    pub user_location: Option<LatLng>,
}

pub trait RenderAdapter {
    /// The view whose filter this adapter renders.
    fn view(&self) -> ViewKind;

    /// Show exactly the projected stops and hide everything else.
    ///
    /// Applying the same projection again must leave the view unchanged.
    fn apply(&mut self, projection: &Projection<'_>);

    /// Identifiers of the stops currently shown.
    fn visible(&self) -> BTreeSet<StopIdentifier>;
}

pub(crate) fn or_na(value: &str) -> &str {
    if value.is_empty() { "N/A" } else { value }
}
