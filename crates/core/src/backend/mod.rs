//! The favorites/stops backend.
//!
//! [`StopBackend`] is the seam between the session and the network; the
//! session only ever talks to the backend through it.

pub mod http;

use std::future::Future;
use std::pin::Pin;

use api_types::{MutationResponse, ToggleFavoriteRequest, ToggleFavoriteResponse, UserFavorites};
use stop_explorer_transit::StopIdentifier;

use crate::error::Result;

pub use http::HttpBackend;

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

pub trait StopBackend: Send + Sync {
    /// `GET /api/busstops`, the raw body. Decoding belongs to
    /// [`StopStore::from_json`](stop_explorer_transit::StopStore::from_json).
    fn fetch_stops(&self) -> BackendFuture<'_, Vec<u8>>;

    /// `GET /get_favorites_count`
    fn favorites_count(&self) -> BackendFuture<'_, u64>;

    /// `GET /api/user_favorites`
    fn user_favorites(&self) -> BackendFuture<'_, UserFavorites>;

    /// `POST /toggle_favorite`
    fn toggle_favorite<'a>(
        &'a self,
        request: &'a ToggleFavoriteRequest,
    ) -> BackendFuture<'a, ToggleFavoriteResponse>;

    /// `POST /remove_favorite`
    fn remove_favorite<'a>(&'a self, id: &'a StopIdentifier) -> BackendFuture<'a, MutationResponse>;

    /// `POST /clear_all_favorites`
    fn clear_all_favorites(&self) -> BackendFuture<'_, MutationResponse>;

    /// `GET /check_favorite/:atco`
    fn check_favorite<'a>(&'a self, id: &'a StopIdentifier) -> BackendFuture<'a, bool>;
}
