//! HTTP client for the GeoJSON boundary document.
//!
//! One GET per load, no retries. The boundary cache in `shokuhi-core` makes
//! sure a successful load happens once per process.

use reqwest::{Client, Url};
use tracing::{debug, info};

use shokuhi_core::HttpConfig;
use shokuhi_core::boundary::BoundarySet;
use shokuhi_core::error::AppError;
use shokuhi_core::traits::BoundarySource;

/// Fetches a GeoJSON FeatureCollection over HTTP(S).
#[derive(Debug, Clone)]
pub struct GeoJsonClient {
    client: Client,
    url: Url,
    join_property: String,
    timeout_secs: u64,
}

impl GeoJsonClient {
    /// Creates a client for the given document URL.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if the URL is invalid or not HTTP(S).
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(url: &str, join_property: &str, http: &HttpConfig) -> Result<Self, AppError> {
        let url = Url::parse(url)
            .map_err(|e| AppError::ConfigError(format!("invalid boundary URL '{}': {}", url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::ConfigError(format!(
                "boundary URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("Shokuhi/", env!("CARGO_PKG_VERSION")))
            .timeout(http.timeout())
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            url,
            join_property: join_property.to_string(),
            timeout_secs: http.timeout_secs,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn fetch_text(&self) -> Result<String, AppError> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::ClientError(format!(
                "HTTP {} from {}",
                status.as_u16(),
                self.url
            )));
        }

        resp.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed: {}", e))
        } else {
            AppError::ClientError(e.to_string())
        }
    }
}

impl BoundarySource for GeoJsonClient {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn load(&self) -> Result<BoundarySet, AppError> {
        info!(url = %self.url, "Fetching boundary GeoJSON");
        let text = self.fetch_text().await?;
        debug!(bytes = text.len(), "Boundary GeoJSON downloaded");
        BoundarySet::from_geojson_str(&text, &self.join_property)
    }
}
