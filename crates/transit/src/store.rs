//! In-memory stop store.
//!
//! Holds every stop fetched at startup. Both the map and the table read from
//! this one store; nothing mutates it after [`StopStore::load`].

use std::collections::HashMap;

use api_types::{BusStopFeature, BusStopFeed};
use geo::Point;
use tracing::{debug, warn};

use crate::identifiers::*;
use crate::models::{Result, StopDetails, StopRecord, TransitError};

/// Upper bound on stops kept from a feed when no other limit is configured.
pub const DEFAULT_MAX_STOPS: usize = 2000;

#[derive(Clone, Debug, Default)]
pub struct StopStore {
    records: Vec<StopRecord>,
    // First record index per identifier.
    by_id: HashMap<StopIdentifier, usize>,
}

impl StopStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, keeping their order.
    ///
    /// Duplicate identifiers are kept as separate records; lookups resolve to
    /// the first one.
    pub fn from_records(records: Vec<StopRecord>) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            by_id.entry(record.id().clone()).or_insert(index);
        }

        Self { records, by_id }
    }

    /// Load the first `max` features of a feed.
    ///
    /// Truncation happens before validation: a feature without a usable point
    /// is skipped but still uses up one of the `max` slots.
    pub fn load(feed: &BusStopFeed, max: usize) -> Result<Self> {
        let features = feed
            .features
            .as_ref()
            .ok_or_else(|| TransitError::Feed("missing `features`".into()))?;

        let mut skipped = 0;
        let records: Vec<_> = features
            .iter()
            .take(max)
            .filter_map(|feature| {
                let record = record_from_feature(feature);
                if record.is_none() {
                    skipped += 1;
                }
                record
            })
            .collect();

        if skipped > 0 {
            warn!(skipped, "skipped stop features without a usable position");
        }
        debug!(
            received = features.len(),
            kept = records.len(),
            max,
            "loaded stop feed"
        );

        Ok(Self::from_records(records))
    }

    /// Parse a raw `/api/busstops` body and load it.
    pub fn from_json(body: &[u8], max: usize) -> Result<Self> {
        let feed: BusStopFeed =
            serde_json::from_slice(body).map_err(|e| TransitError::Feed(e.to_string()))?;
        Self::load(&feed, max)
    }

    pub fn get(&self, id: &StopIdentifier) -> Option<&StopRecord> {
        self.by_id.get(id).map(|&index| &self.records[index])
    }

    pub fn require(&self, id: &StopIdentifier) -> Result<&StopRecord> {
        self.get(id)
            .ok_or_else(|| TransitError::StopNotFound(id.clone()))
    }

    pub fn contains(&self, id: &StopIdentifier) -> bool {
        self.by_id.contains_key(id)
    }

    /// All records in load order.
    pub fn records(&self) -> &[StopRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct, non-blank authorities in the order they first appear.
    pub fn authorities(&self) -> Vec<AuthorityName> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .map(|record| record.authority())
            .filter(|authority| !authority.is_blank())
            .filter(|authority| seen.insert((*authority).clone()))
            .cloned()
            .collect()
    }
}

fn record_from_feature(feature: &BusStopFeature) -> Option<StopRecord> {
    let (lng, lat) = feature.geometry.as_ref()?.lng_lat()?;
    let props = &feature.properties;

    let details = StopDetails {
        name: props.name_indicator.clone().unwrap_or_default(),
        street: props.street_name.clone().unwrap_or_default(),
        locality: props.locality_name.clone().unwrap_or_default(),
        authority: props.local_authority.clone().unwrap_or_default(),
        lines: props.line_dir_list.clone().unwrap_or_default(),
    };

    Some(StopRecord::new(
        props.atco_code.as_deref().unwrap_or_default(),
        details,
        Point::new(lng, lat),
    ))
}
