//! HTTP client for the geocoding API.
//!
//! Wraps `reqwest` with typed response deserialization and transparent
//! retry. Implements [`motoria_geo::Geocoder`], mapping transport failures
//! to `None` so the resolver degrades to its dictionary.

use std::time::Duration;

use reqwest::{Client, Url};

use motoria_geo::{GeocodedPlace, Geocoder};

use crate::error::GeocodeError;
use crate::retry::retry_with_backoff;
use crate::types::SearchResult;

/// Connection settings for [`GeocodeClient::new`].
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

/// Client for a Nominatim-compatible geocoding service.
///
/// Point `base_url` at a mock server in tests.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl GeocodeClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if the
    /// base URL does not parse.
    pub fn new(config: &GeocodeConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.clone())
            .build()?;

        // Normalise: exactly one trailing slash so joined paths land under
        // the configured root instead of replacing its last segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| GeocodeError::InvalidBaseUrl(config.base_url.clone()))?;

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        })
    }

    /// Searches for a free-text location, returning raw result entries.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or non-2xx HTTP status
    ///   after retries are exhausted.
    /// - [`GeocodeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, GeocodeError> {
        let url = self.build_url(query);
        retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, || {
            self.request_json(url.clone())
        })
        .await
    }

    /// Builds the search URL with percent-encoded query parameters.
    fn build_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("search");
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("format", "jsonv2");
            pairs.append_pair("addressdetails", "1");
            pairs.append_pair("limit", "1");
        }
        url
    }

    async fn request_json(&self, url: Url) -> Result<Vec<SearchResult>, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

impl Geocoder for GeocodeClient {
    /// Best-effort lookup: the first result's address mapped into the
    /// resolver's shape, or `None` on any failure or empty result.
    async fn lookup(&self, query: &str) -> Option<GeocodedPlace> {
        let results = match self.search(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(query, error = %e, "geocoding lookup failed");
                return None;
            }
        };

        let address = results.into_iter().find_map(|r| r.address)?;
        Some(GeocodedPlace {
            country_code: address.country_code.clone(),
            province: address.province.clone(),
            state: address.state.clone(),
            county: address.county.clone(),
            city: address.settlement().map(ToString::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GeocodeClient {
        GeocodeClient::new(&GeocodeConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: 5,
            user_agent: "motoria-test/0.1".to_string(),
            max_retries: 2,
            retry_backoff_base_ms: 0,
        })
        .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_search_and_encodes_query() {
        let client = test_client("https://nominatim.openstreetmap.org");
        let url = client.build_url("castellón de la plana");
        assert!(url.path().ends_with("/search"), "path: {}", url.path());
        assert!(
            url.as_str().contains("q=castell%C3%B3n+de+la+plana")
                || url.as_str().contains("q=castell%C3%B3n%20de%20la%20plana"),
            "query should be percent-encoded: {url}"
        );
        assert!(url.as_str().contains("addressdetails=1"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GeocodeClient::new(&GeocodeConfig {
            base_url: "not a url".to_string(),
            request_timeout_secs: 5,
            user_agent: "motoria-test/0.1".to_string(),
            max_retries: 0,
            retry_backoff_base_ms: 0,
        });
        assert!(matches!(result, Err(GeocodeError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn lookup_maps_the_first_result_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Balaguer"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[{
                    "display_name": "Balaguer, Noguera, Lleida",
                    "address": {
                        "town": "Balaguer",
                        "county": "Noguera",
                        "province": "Lleida",
                        "state": "Catalunya",
                        "country_code": "es"
                    }
                }]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let place = client.lookup("Balaguer").await.expect("place expected");
        assert_eq!(place.country_code.as_deref(), Some("es"));
        assert_eq!(place.province.as_deref(), Some("Lleida"));
        assert_eq!(place.state.as_deref(), Some("Catalunya"));
        assert_eq!(place.city.as_deref(), Some("Balaguer"));
    }

    #[tokio::test]
    async fn lookup_returns_none_for_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.lookup("nowhere").await.is_none());
    }

    #[tokio::test]
    async fn lookup_swallows_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.lookup("anywhere").await.is_none());
    }

    #[tokio::test]
    async fn search_retries_5xx_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let results = client.search("León").await.expect("retry should recover");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_surfaces_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("not-json", "application/json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.search("León").await;
        assert!(matches!(result, Err(GeocodeError::Deserialize { .. })));
    }
}
