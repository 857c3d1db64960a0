use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use stop_explorer_transit::DEFAULT_MAX_STOPS;

use crate::error::{ExplorerError, Result};
use crate::viewport::LatLng;

/// Settings for one explorer session.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub base_url: String,
    /// Most stops kept from the feed.
    pub max_stops: usize,
    /// How many stops the "nearest" view shows.
    pub nearest_k: usize,
    pub default_center: LatLng,
    pub default_zoom: u8,
    pub focused_zoom: u8,
    pub csrf_token: Option<String>,
    /// Raw `Cookie` header value identifying the signed-in session.
    pub session_cookie: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            max_stops: DEFAULT_MAX_STOPS,
            nearest_k: 5,
            default_center: LatLng::BRISTOL,
            default_zoom: 12,
            focused_zoom: 15,
            csrf_token: None,
            session_cookie: None,
            request_timeout_secs: 30,
        }
    }
}

impl ExplorerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| ExplorerError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_slice(&data)
            .map_err(|e| ExplorerError::Config(format!("{}: {e}", path.display())))
    }

    /// Base URL with a trailing slash, so endpoint paths join under it.
    pub fn base_url(&self) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base).map_err(|e| ExplorerError::Config(format!("base_url {base:?}: {e}")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
