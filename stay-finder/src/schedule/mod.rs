//! First and last trains between a lodging station and the destination.
//!
//! The last train is the final departure from the destination towards the
//! lodging on the stay date. The first train is the earliest departure from
//! the lodging back towards the destination on the following day. Arrival
//! times are the departure plus the route's travel time, wrapped past
//! midnight.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use moka::future::Cache as MokaCache;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Calendar, ClockTime, RailDirection, StationId};
use crate::providers::{ProviderError, ScheduleProvider};

/// Parameters of a first/last train lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub destination_station: StationId,
    pub hotel_station: StationId,

    /// Direction of travel from the destination to the lodging.
    pub direction_to_hotel: RailDirection,

    /// Direction of travel from the lodging to the destination.
    pub direction_to_destination: RailDirection,

    /// Stay date (check-in).
    pub date: NaiveDate,

    /// Route travel time in minutes.
    pub travel_minutes: u32,
}

/// One train with its departure and computed arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainCall {
    pub departure: ClockTime,
    pub arrival: ClockTime,

    /// Terminus of the train, as reported by the timetable.
    pub destination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstLastTrains {
    pub last_train: Option<TrainCall>,
    pub first_train: Option<TrainCall>,
}

/// A departure listed in a station timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationDeparture {
    pub departure: ClockTime,
    pub destination: String,
}

/// Supplies a station's departures in one direction, in timetable order.
///
/// Timetable order runs from the start of the service day, so departures
/// after midnight come last.
pub trait StationTimetableSource {
    async fn departures(
        &self,
        station: &StationId,
        direction: &RailDirection,
        calendar: Calendar,
    ) -> Result<Vec<StationDeparture>, ProviderError>;
}

impl<S: StationTimetableSource> StationTimetableSource for Option<S> {
    async fn departures(
        &self,
        station: &StationId,
        direction: &RailDirection,
        calendar: Calendar,
    ) -> Result<Vec<StationDeparture>, ProviderError> {
        match self {
            Some(source) => source.departures(station, direction, calendar).await,
            None => Err(ProviderError::NotConfigured("station timetables".to_string())),
        }
    }
}

type TimetableKey = (StationId, RailDirection, Calendar);

/// Configuration for the station timetable cache.
#[derive(Debug, Clone)]
pub struct ScheduleCacheConfig {
    pub ttl: Duration,
    pub max_capacity: u64,
}

impl Default for ScheduleCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(6 * 60 * 60),
            max_capacity: 2000,
        }
    }
}

/// [`ScheduleProvider`] backed by cached station timetables.
pub struct TimetableSchedule<S> {
    source: S,
    timetables: MokaCache<TimetableKey, Arc<Vec<StationDeparture>>>,
}

impl<S: StationTimetableSource> TimetableSchedule<S> {
    pub fn new(source: S, config: &ScheduleCacheConfig) -> Self {
        let timetables = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        Self { source, timetables }
    }

    /// Departures for one station, direction and calendar.
    ///
    /// Only non-empty timetables are cached, so a transient failure or an
    /// empty response is retried on the next lookup.
    pub async fn departures(
        &self,
        station: &StationId,
        direction: &RailDirection,
        calendar: Calendar,
    ) -> Result<Arc<Vec<StationDeparture>>, ProviderError> {
        let key = (station.clone(), direction.clone(), calendar);
        if let Some(cached) = self.timetables.get(&key).await {
            return Ok(cached);
        }

        let departures = Arc::new(self.source.departures(station, direction, calendar).await?);
        if departures.is_empty() {
            debug!(%station, %direction, calendar = calendar.as_odpt(), "station timetable empty");
        } else {
            self.timetables.insert(key, Arc::clone(&departures)).await;
        }
        Ok(departures)
    }

    pub fn cached_timetables(&self) -> u64 {
        self.timetables.entry_count()
    }

    /// Departures, or an empty list if the source failed.
    async fn departures_or_empty(
        &self,
        station: &StationId,
        direction: &RailDirection,
        calendar: Calendar,
    ) -> Arc<Vec<StationDeparture>> {
        match self.departures(station, direction, calendar).await {
            Ok(d) => d,
            Err(e) => {
                warn!(%station, %direction, error = %e, "station timetable unavailable");
                Arc::new(Vec::new())
            }
        }
    }
}

impl<S: StationTimetableSource> ScheduleProvider for TimetableSchedule<S> {
    async fn first_last_trains(
        &self,
        query: &ScheduleQuery,
    ) -> Result<FirstLastTrains, ProviderError> {
        let today = Calendar::for_date(query.date);
        let next_day = query
            .date
            .checked_add_days(Days::new(1))
            .unwrap_or(query.date);
        let tomorrow = Calendar::for_date(next_day);

        let outbound = self
            .departures_or_empty(&query.destination_station, &query.direction_to_hotel, today)
            .await;
        let inbound = self
            .departures_or_empty(&query.hotel_station, &query.direction_to_destination, tomorrow)
            .await;

        Ok(FirstLastTrains {
            last_train: outbound.last().map(|d| train_call(d, query.travel_minutes)),
            first_train: inbound.first().map(|d| train_call(d, query.travel_minutes)),
        })
    }
}

fn train_call(departure: &StationDeparture, travel_minutes: u32) -> TrainCall {
    TrainCall {
        departure: departure.departure,
        arrival: departure.departure.add_minutes(travel_minutes),
        destination: departure.destination.clone(),
    }
}
