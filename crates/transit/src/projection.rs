//! Filtered views over the stop list.
//!
//! [`project`] only reads its input. Text and authority filters keep input
//! order; the nearest filter orders by distance.

use std::collections::BTreeSet;

use geo::Point;

use crate::identifiers::*;
use crate::models::StopRecord;
use crate::spatial::nearest_k;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Filter {
    #[default]
    All,

    /// Case-insensitive substring over name, street, locality, authority and
    /// lines. An empty query matches everything.
    Text(String),

    /// Like [`Filter::Text`], but also matches the ATCO code, since the table
    /// shows it as a column.
    TableText(String),

    /// Exact authority membership. An empty set means "no filter".
    Authorities(BTreeSet<AuthorityName>),

    /// The `k` stops nearest to `origin` by haversine distance.
    NearestK { origin: Point, k: usize },
}

impl Filter {
    pub fn text(query: impl Into<String>) -> Self {
        Self::Text(query.into())
    }

    pub fn authorities<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AuthorityName>,
    {
        Self::Authorities(names.into_iter().map(Into::into).collect())
    }
}

pub fn project<'a>(stops: &'a [StopRecord], filter: &Filter) -> Vec<&'a StopRecord> {
    match filter {
        Filter::All => stops.iter().collect(),
        Filter::Text(query) => matching_text(stops, query, false),
        Filter::TableText(query) => matching_text(stops, query, true),
        Filter::Authorities(selected) if selected.is_empty() => stops.iter().collect(),
        Filter::Authorities(selected) => stops
            .iter()
            .filter(|stop| selected.contains(stop.authority()))
            .collect(),
        Filter::NearestK { origin, k } => nearest_k(stops, *origin, *k)
            .into_iter()
            .map(|(stop, _)| stop)
            .collect(),
    }
}

fn matching_text<'a>(stops: &'a [StopRecord], query: &str, include_code: bool) -> Vec<&'a StopRecord> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return stops.iter().collect();
    }

    stops
        .iter()
        .filter(|stop| stop.search_text().contains(&needle, include_code))
        .collect()
}
