//! Vacancy search HTTP client.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::Lodging;
use crate::providers::{LodgingProvider, LodgingQuery, ProviderError};

use super::cache::{LodgingCache, LodgingCacheConfig};
use super::types::{VacancyResponse, convert_response};

/// Default vacancy search endpoint.
const DEFAULT_BASE_URL: &str =
    "https://app.rakuten.co.jp/services/api/Travel/VacantHotelSearch/20170426";

/// The API allows about one request per second; requests are serialized.
const DEFAULT_MAX_CONCURRENT: usize = 1;

/// Search radius in kilometres.
const DEFAULT_SEARCH_RADIUS_KM: f64 = 1.0;

/// Configuration for the lodging client.
#[derive(Debug, Clone)]
pub struct LodgingConfig {
    /// Application id. Empty means unconfigured.
    pub app_id: String,
    pub base_url: String,
    pub max_concurrent: usize,
    pub timeout_secs: u64,
    pub search_radius_km: f64,
    pub cache: LodgingCacheConfig,
}

impl LodgingConfig {
    /// Create a new config with the given application id.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            cache: LodgingCacheConfig::default(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_search_radius(mut self, km: f64) -> Self {
        self.search_radius_km = km;
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.app_id.trim().is_empty()
    }
}

/// Vacancy search client with a day-scoped result cache.
///
/// Without an application id every search logs a warning and returns no
/// offers.
pub struct RakutenClient {
    http: reqwest::Client,
    config: LodgingConfig,
    semaphore: Arc<Semaphore>,
    cache: LodgingCache,
}

impl RakutenClient {
    pub fn new(config: LodgingConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            cache: LodgingCache::new(&config.cache),
            config,
        })
    }

    pub fn cache(&self) -> &LodgingCache {
        &self.cache
    }

    fn query_params(&self, query: &LodgingQuery) -> Vec<(&'static str, String)> {
        vec![
            ("applicationId", self.config.app_id.clone()),
            ("format", "json".to_string()),
            ("checkinDate", query.check_in.format("%Y-%m-%d").to_string()),
            ("checkoutDate", query.check_out.format("%Y-%m-%d").to_string()),
            ("latitude", query.coord.lat.to_string()),
            ("longitude", query.coord.lng.to_string()),
            ("searchRadius", self.config.search_radius_km.to_string()),
            ("adultNum", query.guests.to_string()),
            ("roomNum", query.rooms.to_string()),
            // WGS84 degrees
            ("datumType", "1".to_string()),
        ]
    }

    async fn fetch(&self, query: &LodgingQuery) -> Result<VacancyResponse, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&self.query_params(query))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        // No vacancies is reported as 404.
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(VacancyResponse::default());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::json(e, &body))
    }

    /// Search as of `today`, which scopes the cache.
    pub async fn search_on(
        &self,
        today: NaiveDate,
        query: &LodgingQuery,
    ) -> Result<Vec<Lodging>, ProviderError> {
        if !self.config.is_configured() {
            warn!("lodging application id not set, returning no offers");
            return Ok(Vec::new());
        }

        if let Some(hit) = self.cache.get(today, query).await {
            debug!(key = %LodgingCache::query_key(query), "lodging cache hit");
            return Ok(hit.as_ref().clone());
        }

        let response = self.fetch(query).await?;
        let lodgings = convert_response(&response, query.nights());
        debug!(
            key = %LodgingCache::query_key(query),
            offers = lodgings.len(),
            "lodging search"
        );
        self.cache.insert(today, query, lodgings.clone()).await;
        Ok(lodgings)
    }
}

impl LodgingProvider for RakutenClient {
    async fn search(&self, query: &LodgingQuery) -> Result<Vec<Lodging>, ProviderError> {
        self.search_on(Local::now().date_naive(), query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coord;

    fn query() -> LodgingQuery {
        LodgingQuery {
            coord: Coord::new(35.66, 139.7),
            check_in: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 3, 16).unwrap(),
            guests: 2,
            rooms: 1,
        }
    }

    #[test]
    fn config_builder() {
        let config = LodgingConfig::new("app")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(3)
            .with_timeout(5)
            .with_search_radius(2.5);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.search_radius_km, 2.5);
        assert!(config.is_configured());
        assert!(!LodgingConfig::new(" ").is_configured());
    }

    #[test]
    fn request_parameters() {
        let client = RakutenClient::new(LodgingConfig::new("app")).unwrap();
        let params = client.query_params(&query());
        let get = |k: &str| params.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str());

        assert_eq!(get("applicationId"), Some("app"));
        assert_eq!(get("checkinDate"), Some("2024-03-15"));
        assert_eq!(get("checkoutDate"), Some("2024-03-16"));
        assert_eq!(get("latitude"), Some("35.66"));
        assert_eq!(get("searchRadius"), Some("1"));
        assert_eq!(get("adultNum"), Some("2"));
        assert_eq!(get("datumType"), Some("1"));
    }

    #[tokio::test]
    async fn unconfigured_client_returns_nothing() {
        let client = RakutenClient::new(
            LodgingConfig::new("").with_base_url("http://127.0.0.1:9"),
        )
        .unwrap();
        let offers = client.search(&query()).await.unwrap();
        assert!(offers.is_empty());
    }

    #[tokio::test]
    async fn cached_results_skip_the_request() {
        let client = RakutenClient::new(
            LodgingConfig::new("app")
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(2),
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        client
            .cache()
            .insert(today, &query(), vec![Lodging::new("Cached", 6_000)])
            .await;

        let offers = client.search_on(today, &query()).await.unwrap();
        assert_eq!(offers[0].name, "Cached");

        let next_day = today.succ_opt().unwrap();
        assert!(client.search_on(next_day, &query()).await.is_err());
    }
}
