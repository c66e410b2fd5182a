//! Walking times from an OSRM foot-routing server.
//!
//! Every failure (transport, status, body, "no route") is reported as
//! `None`; the caller decides what a missing walk means.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::Coord;
use crate::providers::{ProviderError, WalkingTimeProvider};

/// Public OSRM instance with a foot profile.
const DEFAULT_BASE_URL: &str = "https://routing.openstreetmap.de/routed-foot";

const DEFAULT_MAX_CONCURRENT: usize = 4;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub max_concurrent: usize,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: "foot".to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    config: OsrmConfig,
    semaphore: Arc<Semaphore>,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            config,
        })
    }

    /// Route URL. OSRM takes `lng,lat` pairs.
    fn route_url(&self, from: Coord, to: Coord) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.lng,
            from.lat,
            to.lng,
            to.lat
        )
    }

    async fn fetch_route(&self, from: Coord, to: Coord) -> Result<RouteResponse, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self.http.get(self.route_url(from, to)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::json(e, &body))
    }
}

impl WalkingTimeProvider for OsrmClient {
    async fn walk_minutes(&self, from: Coord, to: Coord) -> Option<u32> {
        match self.fetch_route(from, to).await {
            Ok(route) => {
                let minutes = route.minutes();
                if minutes.is_none() {
                    debug!(code = %route.code, "no walking route found");
                }
                minutes
            }
            Err(e) => {
                warn!(error = %e, "walking route lookup failed");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    /// Seconds.
    duration: f64,
}

impl RouteResponse {
    /// Duration of the first route in whole minutes, rounded.
    fn minutes(&self) -> Option<u32> {
        if self.code != "Ok" {
            return None;
        }
        let route = self.routes.first()?;
        Some((route.duration / 60.0).round().max(0.0) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> RouteResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn minutes_round_to_nearest() {
        let r = parse(r#"{"code":"Ok","routes":[{"duration":449.9,"distance":600.0},{"duration":10.0}]}"#);
        assert_eq!(r.minutes(), Some(7));
        let r = parse(r#"{"code":"Ok","routes":[{"duration":450.0}]}"#);
        assert_eq!(r.minutes(), Some(8));
    }

    #[test]
    fn no_route_is_none() {
        assert_eq!(parse(r#"{"code":"NoRoute","routes":[]}"#).minutes(), None);
        assert_eq!(parse(r#"{"code":"Ok","routes":[]}"#).minutes(), None);
        assert_eq!(parse(r#"{"code":"Ok"}"#).minutes(), None);
    }

    #[test]
    fn url_puts_longitude_first() {
        let client = OsrmClient::new(OsrmConfig::new().with_base_url("http://osrm.test/")).unwrap();
        let url = client.route_url(Coord::new(35.5, 139.5), Coord::new(35.25, 139.75));
        assert_eq!(
            url,
            "http://osrm.test/route/v1/foot/139.5,35.5;139.75,35.25?overview=false"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_none() {
        let client = OsrmClient::new(
            OsrmConfig::new()
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(2),
        )
        .unwrap();
        let minutes = client
            .walk_minutes(Coord::new(35.0, 139.0), Coord::new(35.1, 139.1))
            .await;
        assert_eq!(minutes, None);
    }
}
