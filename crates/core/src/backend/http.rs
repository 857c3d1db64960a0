use api_types::{
    CSRF_HEADER, CheckFavoriteResponse, FavoritesCount, MutationResponse,
    RemoveFavoriteRequest, ToggleFavoriteRequest, ToggleFavoriteResponse, UserFavorites,
    endpoints,
};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use stop_explorer_transit::StopIdentifier;
use tracing::debug;

use super::{BackendFuture, StopBackend};
use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};

/// [`StopBackend`] over HTTP with JSON bodies.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base: Url,
    csrf_token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ExplorerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| ExplorerError::Config(format!("session_cookie: {e}")))?;
            headers.insert(header::COOKIE, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base: config.base_url()?,
            csrf_token: config.csrf_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ExplorerError::Config(format!("{path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = ensure_success(endpoint, self.client.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    /// Mutating endpoints answer with a JSON body even on 4xx (CSRF and login
    /// failures), so the body is decoded before the status is considered.
    async fn post_json<B, T>(&self, endpoint: &'static str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(endpoint)?;
        debug!(%url, "POST");

        let mut request = self.client.post(url);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }
        request = match body {
            Some(body) => request.json(body),
            None => request.header(header::CONTENT_TYPE, "application/json"),
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        match serde_json::from_slice(&bytes) {
            Ok(decoded) => Ok(decoded),
            Err(_) if !status.is_success() => Err(ExplorerError::Status {
                endpoint,
                status: status.as_u16(),
            }),
            Err(e) => Err(ExplorerError::Backend(format!(
                "unexpected response from {endpoint}: {e}"
            ))),
        }
    }
}

fn ensure_success(endpoint: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ExplorerError::Status {
            endpoint,
            status: status.as_u16(),
        })
    }
}

impl StopBackend for HttpBackend {
    fn fetch_stops(&self) -> BackendFuture<'_, Vec<u8>> {
        Box::pin(async move {
            let url = self.endpoint(endpoints::BUS_STOPS)?;
            debug!(%url, "GET");
            let response = ensure_success(endpoints::BUS_STOPS, self.client.get(url).send().await?)?;
            Ok(response.bytes().await?.to_vec())
        })
    }

    fn favorites_count(&self) -> BackendFuture<'_, u64> {
        Box::pin(async move {
            let url = self.endpoint(endpoints::FAVORITES_COUNT)?;
            let count: FavoritesCount = self.get_json(endpoints::FAVORITES_COUNT, url).await?;
            Ok(count.count)
        })
    }

    fn user_favorites(&self) -> BackendFuture<'_, UserFavorites> {
        Box::pin(async move {
            let url = self.endpoint(endpoints::USER_FAVORITES)?;
            self.get_json(endpoints::USER_FAVORITES, url).await
        })
    }

    fn toggle_favorite<'a>(
        &'a self,
        request: &'a ToggleFavoriteRequest,
    ) -> BackendFuture<'a, ToggleFavoriteResponse> {
        Box::pin(async move {
            self.post_json(endpoints::TOGGLE_FAVORITE, Some(request))
                .await
        })
    }

    fn remove_favorite<'a>(&'a self, id: &'a StopIdentifier) -> BackendFuture<'a, MutationResponse> {
        Box::pin(async move {
            let body = RemoveFavoriteRequest {
                atco_code: id.to_string(),
            };
            self.post_json(endpoints::REMOVE_FAVORITE, Some(&body))
                .await
        })
    }

    fn clear_all_favorites(&self) -> BackendFuture<'_, MutationResponse> {
        Box::pin(async move {
            self.post_json::<(), _>(endpoints::CLEAR_ALL_FAVORITES, None)
                .await
        })
    }

    fn check_favorite<'a>(&'a self, id: &'a StopIdentifier) -> BackendFuture<'a, bool> {
        Box::pin(async move {
            let mut url = self.endpoint(endpoints::CHECK_FAVORITE)?;
            url.path_segments_mut()
                .map_err(|_| ExplorerError::Config(format!("cannot append to {}", self.base)))?
                .push(id.as_str());

            let response: CheckFavoriteResponse =
                self.get_json(endpoints::CHECK_FAVORITE, url).await?;
            Ok(response.is_favorite)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_join_under_base_path() {
        let config = ExplorerConfig {
            base_url: "https://stops.example.org/app".into(),
            ..Default::default()
        };
        let backend = HttpBackend::new(&config).unwrap();

        assert_eq!(
            backend.endpoint(endpoints::BUS_STOPS).unwrap().as_str(),
            "https://stops.example.org/app/api/busstops"
        );
    }

    #[test]
    fn test_bad_cookie_is_config_error() {
        let config = ExplorerConfig {
            session_cookie: Some("session=abc\n".into()),
            ..Default::default()
        };
        assert!(matches!(
            HttpBackend::new(&config),
            Err(ExplorerError::Config(_))
        ));
    }
}
