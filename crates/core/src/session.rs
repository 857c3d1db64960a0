//! One explorer session: the stop store, the favorite set and the active
//! view, bundled into an explicit context object.
//!
//! State lives behind an async `RwLock` that is never held across a backend
//! or geolocation await, so concurrent handlers only interleave at those
//! suspension points.

use std::collections::BTreeSet;

use api_types::{FavoriteAction, UserFavorites};
use stop_explorer_transit::{
    AuthorityName, FavoriteState, Filter, StopIdentifier, StopStore, nearest_k, project,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::backend::StopBackend;
use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};
use crate::inflight::{InFlight, ViewGeneration};
use crate::location::LocationSource;
use crate::render::{Projection, RenderAdapter, ViewKind};
use crate::status::StatusMessage;
use crate::viewport::{LatLng, Viewport};

/// Padding applied around the nearest stops when fitting the map to them.
const NEAREST_BOUNDS_PAD: f64 = 0.2;

const BOTH_VIEWS: [ViewKind; 2] = [ViewKind::Map, ViewKind::Table];

#[derive(Clone, Debug, PartialEq)]
pub struct NearestStop {
    pub id: StopIdentifier,
    pub name: String,
    pub distance_m: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NearestOutcome {
    Found(Vec<NearestStop>),
    /// No usable position; the map went back to the default center.
    Fallback,
    /// Another view request was made while waiting for the position.
    Superseded,
}

struct SessionState {
    stops: StopStore,
    favorites: FavoriteState,
    map_filter: Filter,
    table_filter: Filter,
    user_location: Option<LatLng>,
    viewport: Viewport,
    status: Option<StatusMessage>,
    badge: u64,
}

pub struct ExplorerSession<B> {
    backend: B,
    config: ExplorerConfig,
    state: RwLock<SessionState>,
    pending: InFlight<StopIdentifier>,
    generation: ViewGeneration,
}

impl<B: StopBackend> ExplorerSession<B> {
    pub fn new(backend: B, config: ExplorerConfig) -> Self {
        let state = SessionState {
            stops: StopStore::new(),
            favorites: FavoriteState::new(),
            map_filter: Filter::All,
            table_filter: Filter::All,
            user_location: None,
            viewport: Viewport::default_center(&config),
            status: None,
            badge: 0,
        };

        Self {
            backend,
            config,
            state: RwLock::new(state),
            pending: InFlight::new(),
            generation: ViewGeneration::default(),
        }
    }

    /// Start centered on the page's `lat`/`lng` query parameters.
    pub fn with_query(mut self, lat: Option<&str>, lng: Option<&str>) -> Self {
        self.state.get_mut().viewport = Viewport::from_query(lat, lng, &self.config);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Initial load: stops, then the favorites count, then the favorites list
    /// only if the count is non-zero.
    ///
    /// Never fails; a broken feed leaves the session with zero stops and an
    /// error status. Returns the number of stops loaded.
    pub async fn load(&self) -> usize {
        info!("loading bus stops");
        let stops = match self.fetch_store().await {
            Ok(stops) => stops,
            Err(e) => {
                error!(error = %e, "failed to load bus stops");
                let mut state = self.state.write().await;
                state.stops = StopStore::new();
                state.status = Some(StatusMessage::LoadFailed);
                return 0;
            }
        };

        let (count, favorites) = self.fetch_favorites().await;

        let loaded = stops.len();
        let mut state = self.state.write().await;
        state.stops = stops;
        state.favorites = favorites;
        state.badge = count;
        state.map_filter = Filter::All;
        state.table_filter = Filter::All;
        state.status = Some(StatusMessage::StopsLoaded(loaded));
        info!(stops = loaded, favorites = count, "explorer ready");

        loaded
    }

    async fn fetch_store(&self) -> Result<StopStore> {
        let body = self.backend.fetch_stops().await?;
        Ok(StopStore::from_json(&body, self.config.max_stops)?)
    }

    async fn fetch_favorites(&self) -> (u64, FavoriteState) {
        let count = match self.backend.favorites_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "could not load favorites count");
                return (0, FavoriteState::new());
            }
        };
        debug!(count, "user favorites");

        if count == 0 {
            return (0, FavoriteState::new());
        }

        match self.backend.user_favorites().await {
            Ok(list) => (count, FavoriteState::hydrate(count, Some(&list))),
            Err(e) => {
                warn!(error = %e, "could not load user favorites");
                (count, FavoriteState::new())
            }
        }
    }

    // ---- View filters ----

    /// Map search box; the table keeps its own filter. Returns how many
    /// stops are now shown.
    pub async fn search(&self, query: &str) -> usize {
        self.set_filter(&[ViewKind::Map], Filter::text(query), StatusMessage::Filtered)
            .await
    }

    /// Table search box, which also matches ATCO codes. The map is left alone.
    pub async fn search_table(&self, query: &str) -> usize {
        self.set_filter(
            &[ViewKind::Table],
            Filter::TableText(query.to_string()),
            StatusMessage::Filtered,
        )
        .await
    }

    /// Authority checkboxes, applied to both views; no selection shows every
    /// stop.
    pub async fn filter_authorities(&self, selected: BTreeSet<AuthorityName>) -> usize {
        let status = if selected.is_empty() {
            StatusMessage::ShowingAll
        } else {
            StatusMessage::AuthorityFilterApplied
        };
        self.set_filter(&BOTH_VIEWS, Filter::Authorities(selected), status)
            .await
    }

    /// Clear the filters of both views.
    pub async fn show_all(&self) -> usize {
        self.set_filter(&BOTH_VIEWS, Filter::All, StatusMessage::ShowingAll)
            .await
    }

    async fn set_filter(&self, views: &[ViewKind], filter: Filter, status: StatusMessage) -> usize {
        // A pending location fix only ever lands on the map.
        if views.contains(&ViewKind::Map) {
            self.generation.issue();
        }

        let mut state = self.state.write().await;
        let visible = project(state.stops.records(), &filter).len();
        for view in views {
            match view {
                ViewKind::Map => {
                    state.map_filter = filter.clone();
                    state.user_location = None;
                }
                ViewKind::Table => state.table_filter = filter.clone(),
            }
        }
        state.status = Some(status);
        visible
    }

    /// Show the stops nearest to the user's position on the map.
    ///
    /// If another map request is made while the position is pending, the
    /// late position is dropped.
    pub async fn find_nearest(&self, source: &dyn LocationSource) -> NearestOutcome {
        let ticket = self.generation.issue();
        self.set_status(StatusMessage::Locating).await;

        let position = source.current_position().await;

        let mut state = self.state.write().await;
        if !self.generation.is_current(ticket) {
            debug!("discarding superseded location fix");
            return NearestOutcome::Superseded;
        }

        let origin = match position {
            Ok(origin) if origin.is_finite() => origin,
            Ok(origin) => {
                warn!(?origin, "ignoring non-finite position");
                state.viewport = Viewport::default_center(&self.config);
                state.status = Some(StatusMessage::LocationFallback);
                return NearestOutcome::Fallback;
            }
            Err(e) => {
                warn!(error = %e, "location unavailable");
                state.viewport = Viewport::default_center(&self.config);
                state.status = Some(match e {
                    ExplorerError::GeolocationUnsupported => StatusMessage::GeolocationUnsupported,
                    _ => StatusMessage::LocationFallback,
                });
                return NearestOutcome::Fallback;
            }
        };

        let k = self.config.nearest_k;
        let found = nearest_k(state.stops.records(), origin.to_point(), k);
        let points: Vec<_> = found
            .iter()
            .map(|(record, _)| record.position())
            .chain(std::iter::once(origin.to_point()))
            .collect();
        let nearest: Vec<_> = found
            .into_iter()
            .map(|(record, distance_m)| NearestStop {
                id: record.id().clone(),
                name: record.name().to_string(),
                distance_m,
            })
            .collect();

        let centered = Viewport::Center {
            center: origin,
            zoom: self.config.focused_zoom,
        };
        state.viewport = if nearest.is_empty() {
            centered
        } else {
            Viewport::fit(points, NEAREST_BOUNDS_PAD).unwrap_or(centered)
        };
        state.map_filter = Filter::NearestK {
            origin: origin.to_point(),
            k,
        };
        state.user_location = Some(origin);
        state.status = Some(StatusMessage::ShowingNearest(nearest.len()));

        NearestOutcome::Found(nearest)
    }

    // ---- Favorites ----

    /// Toggle a stop's favorite status. The backend decides the action; the
    /// local set follows its answer and is untouched on failure.
    pub async fn toggle_favorite(&self, id: &StopIdentifier) -> Result<FavoriteAction> {
        let guard = self
            .pending
            .try_begin(id)
            .ok_or_else(|| ExplorerError::RequestInFlight(id.clone()))?;

        let request = self.state.read().await.stops.require(id)?.toggle_request();

        let response = match self.backend.toggle_favorite(&request).await {
            Ok(response) => response,
            Err(e) => return Err(self.report_failure("toggle favorite", e).await),
        };

        let action = match (response.success, response.action) {
            (true, Some(action)) => action,
            _ => {
                let message = response
                    .error
                    .unwrap_or_else(|| "Failed to update favorite".to_string());
                return Err(self.report_rejection(message).await);
            }
        };

        {
            let mut state = self.state.write().await;
            state.favorites.apply(id.clone(), action);
            state.status = Some(match action {
                FavoriteAction::Added => StatusMessage::FavoriteAdded,
                FavoriteAction::Removed => StatusMessage::FavoriteRemoved,
            });
        }
        debug!(%id, %action, "favorite toggled");

        drop(guard);
        self.refresh_badge().await;
        Ok(action)
    }

    /// Remove one favorite (favorites page).
    pub async fn remove_favorite(&self, id: &StopIdentifier) -> Result<()> {
        let guard = self
            .pending
            .try_begin(id)
            .ok_or_else(|| ExplorerError::RequestInFlight(id.clone()))?;

        let response = match self.backend.remove_favorite(id).await {
            Ok(response) => response,
            Err(e) => return Err(self.report_failure("remove favorite", e).await),
        };

        if !response.success {
            let message = format!(
                "Failed to remove favorite: {}",
                response.error.as_deref().unwrap_or("Unknown error")
            );
            return Err(self.report_rejection(message).await);
        }

        {
            let mut state = self.state.write().await;
            state.favorites.remove(id);
            state.status = Some(StatusMessage::FavoriteRemoved);
        }

        drop(guard);
        self.refresh_badge().await;
        Ok(())
    }

    /// Remove every favorite once the backend confirms. Returns how many
    /// were removed locally.
    pub async fn clear_all_favorites(&self) -> Result<usize> {
        let response = match self.backend.clear_all_favorites().await {
            Ok(response) => response,
            Err(e) => return Err(self.report_failure("clear favorites", e).await),
        };

        if !response.success {
            let message = format!(
                "Failed to clear favorites: {}",
                response.error.as_deref().unwrap_or("Unknown error")
            );
            return Err(self.report_rejection(message).await);
        }

        let removed = {
            let mut state = self.state.write().await;
            let removed = state.favorites.clear_all();
            state.status = Some(StatusMessage::FavoritesCleared(removed));
            removed
        };

        self.refresh_badge().await;
        Ok(removed)
    }

    /// Ask the backend directly; any failure reads as "not a favorite".
    pub async fn check_favorite(&self, id: &StopIdentifier) -> bool {
        match self.backend.check_favorite(id).await {
            Ok(is_favorite) => is_favorite,
            Err(e) => {
                warn!(error = %e, %id, "error checking favorite");
                false
            }
        }
    }

    /// The stored favorites with their details, for the favorites page.
    pub async fn user_favorites(&self) -> Result<UserFavorites> {
        self.backend.user_favorites().await
    }

    /// Re-read the favorites count for the badge. On failure the previous
    /// count is kept.
    pub async fn refresh_badge(&self) -> u64 {
        match self.backend.favorites_count().await {
            Ok(count) => {
                self.state.write().await.badge = count;
                count
            }
            Err(e) => {
                warn!(error = %e, "error updating favorites badge");
                self.state.read().await.badge
            }
        }
    }

    async fn report_failure(&self, what: &str, e: ExplorerError) -> ExplorerError {
        warn!(error = %e, "{what} failed");
        let status = if e.is_network() {
            StatusMessage::NetworkError
        } else {
            StatusMessage::Error(e.to_string())
        };
        self.set_status(status).await;
        e
    }

    async fn report_rejection(&self, message: String) -> ExplorerError {
        warn!(%message, "backend rejected request");
        self.set_status(StatusMessage::Error(message.clone())).await;
        ExplorerError::Backend(message)
    }

    async fn set_status(&self, status: StatusMessage) {
        self.state.write().await.status = Some(status);
    }

    // ---- Rendering and reads ----

    /// Reconcile an adapter with the filter of the view it draws.
    pub async fn render<A: RenderAdapter + ?Sized>(&self, adapter: &mut A) {
        let state = self.state.read().await;
        let (filter, user_location) = match adapter.view() {
            ViewKind::Map => (&state.map_filter, state.user_location),
            ViewKind::Table => (&state.table_filter, None),
        };

        let records = state.stops.records();
        let projection = Projection {
            all: state.favorites.annotate(records),
            stops: state.favorites.annotate(project(records, filter)),
            user_location,
        };
        adapter.apply(&projection);
    }

    pub async fn status(&self) -> Option<StatusMessage> {
        self.state.read().await.status.clone()
    }

    pub async fn badge(&self) -> u64 {
        self.state.read().await.badge
    }

    pub async fn viewport(&self) -> Viewport {
        self.state.read().await.viewport
    }

    pub async fn filter(&self, view: ViewKind) -> Filter {
        let state = self.state.read().await;
        match view {
            ViewKind::Map => state.map_filter.clone(),
            ViewKind::Table => state.table_filter.clone(),
        }
    }

    pub async fn stop_count(&self) -> usize {
        self.state.read().await.stops.len()
    }

    pub async fn authorities(&self) -> Vec<AuthorityName> {
        self.state.read().await.stops.authorities()
    }

    pub async fn is_favorite(&self, id: &StopIdentifier) -> bool {
        self.state.read().await.favorites.contains(id)
    }

    pub async fn favorite_ids(&self) -> BTreeSet<StopIdentifier> {
        self.state.read().await.favorites.iter().cloned().collect()
    }
}
