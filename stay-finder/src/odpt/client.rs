//! ODPT HTTP client.
//!
//! Provides topology, timetable samples, fare rows and station timetables
//! from the Open Data for Public Transportation API. Every request carries
//! the consumer key as a query parameter.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Calendar, Line, RailDirection, Station, StationId};
use crate::fare::FareRow;
use crate::network::TrainTrip;
use crate::providers::{FareTableProvider, ProviderError, TimetableProvider, TopologyProvider};
use crate::schedule::{StationDeparture, StationTimetableSource};

use super::convert::{convert_fares, convert_station_timetable, convert_trip, order_stations};
use super::lines::{TOKYO_METRO_OPERATOR, tokyo_metro_lines};
use super::types::{RailwayDto, RailwayFareDto, StationDto, StationTimetableDto, TrainTimetableDto};

/// Default base URL for the ODPT API.
const DEFAULT_BASE_URL: &str = "https://api.odpt.org/api/v4";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the ODPT client.
#[derive(Debug, Clone)]
pub struct OdptConfig {
    /// Consumer key
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OdptConfig {
    /// Create a new config with the given consumer key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
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
}

/// ODPT API client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct OdptClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl OdptClient {
    /// Create a new client. Fails if the consumer key is empty.
    pub fn new(config: OdptConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured("ODPT_API_KEY".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch and decode one resource, e.g. `odpt:Station`.
    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/{}", self.base_url, resource);
        debug!(resource, ?params, "ODPT request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("acl:consumerKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
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

    /// Departures from `station` toward `direction` on `calendar`, in
    /// timetable order.
    pub async fn station_timetable(
        &self,
        station: &StationId,
        direction: &RailDirection,
        calendar: Calendar,
    ) -> Result<Vec<StationDeparture>, ProviderError> {
        let dtos: Vec<StationTimetableDto> = self
            .get(
                "odpt:StationTimetable",
                &[
                    ("odpt:station", station.as_str()),
                    ("odpt:railDirection", direction.as_str()),
                    ("odpt:calendar", calendar.as_odpt()),
                ],
            )
            .await?;
        Ok(convert_station_timetable(&dtos))
    }
}

impl TopologyProvider for OdptClient {
    fn list_lines(&self) -> Vec<Line> {
        tokyo_metro_lines()
    }

    async fn stations_of(&self, line: &Line) -> Result<Vec<Station>, ProviderError> {
        let railways: Vec<RailwayDto> = self
            .get("odpt:Railway", &[("owl:sameAs", line.id.as_str())])
            .await?;
        let stations: Vec<StationDto> = self
            .get("odpt:Station", &[("odpt:railway", line.id.as_str())])
            .await?;
        Ok(order_stations(line, railways.first(), stations))
    }
}

impl TimetableProvider for OdptClient {
    async fn sample_trips(&self, line: &Line) -> Result<Vec<TrainTrip>, ProviderError> {
        let dtos: Vec<TrainTimetableDto> = self
            .get(
                "odpt:TrainTimetable",
                &[
                    ("odpt:railway", line.id.as_str()),
                    ("odpt:calendar", Calendar::Weekday.as_odpt()),
                ],
            )
            .await?;
        Ok(dtos.iter().map(convert_trip).collect())
    }
}

impl FareTableProvider for OdptClient {
    async fn fares_from(&self, station: &StationId) -> Result<Vec<FareRow>, ProviderError> {
        let dtos: Vec<RailwayFareDto> = self
            .get(
                "odpt:RailwayFare",
                &[
                    ("odpt:operator", TOKYO_METRO_OPERATOR),
                    ("odpt:fromStation", station.as_str()),
                ],
            )
            .await?;
        Ok(convert_fares(&dtos))
    }
}

impl StationTimetableSource for OdptClient {
    async fn departures(
        &self,
        station: &StationId,
        direction: &RailDirection,
        calendar: Calendar,
    ) -> Result<Vec<StationDeparture>, ProviderError> {
        self.station_timetable(station, direction, calendar).await
    }
}
