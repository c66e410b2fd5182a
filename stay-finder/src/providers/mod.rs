//! Contracts for external collaborators.
//!
//! The planner never talks to HTTP services directly. Each data source sits
//! behind one of these traits so the search can be exercised with in-memory
//! data, and so a failing source degrades to a fallback instead of aborting
//! the run.

mod error;

use chrono::NaiveDate;

use crate::domain::{Coord, Line, Lodging, Station, StationId};
use crate::fare::FareRow;
use crate::network::TrainTrip;
use crate::schedule::{FirstLastTrains, ScheduleQuery};

pub use error::ProviderError;

/// Supplies lines and their ordered stations.
pub trait TopologyProvider {
    /// All lines to load, in catalog order.
    fn list_lines(&self) -> Vec<Line>;

    /// Stations of `line` in physical order along the line.
    async fn stations_of(&self, line: &Line) -> Result<Vec<Station>, ProviderError>;
}

/// Supplies sampled train trips used to refine edge weights.
pub trait TimetableProvider {
    async fn sample_trips(&self, line: &Line) -> Result<Vec<TrainTrip>, ProviderError>;
}

/// Supplies fare table rows departing from a station.
pub trait FareTableProvider {
    async fn fares_from(&self, station: &StationId) -> Result<Vec<FareRow>, ProviderError>;
}

/// A missing fare source reports itself unconfigured on every lookup.
impl<P: FareTableProvider> FareTableProvider for Option<P> {
    async fn fares_from(&self, station: &StationId) -> Result<Vec<FareRow>, ProviderError> {
        match self {
            Some(provider) => provider.fares_from(station).await,
            None => Err(ProviderError::NotConfigured("fare table".to_string())),
        }
    }
}

/// Parameters of a lodging vacancy search around one position.
#[derive(Debug, Clone, PartialEq)]
pub struct LodgingQuery {
    pub coord: Coord,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub rooms: u32,
}

impl LodgingQuery {
    /// Number of nights, never less than one.
    pub fn nights(&self) -> u32 {
        nights_between(self.check_in, self.check_out)
    }
}

/// Nights between two dates, clamped to at least one.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    (check_out - check_in).num_days().max(1) as u32
}

/// Searches lodging offers near a position.
///
/// An empty list means "no offers here", not an error. Results are not
/// assumed to be sorted.
pub trait LodgingProvider {
    async fn search(&self, query: &LodgingQuery) -> Result<Vec<Lodging>, ProviderError>;
}

/// Estimates walking time between two positions.
pub trait WalkingTimeProvider {
    /// Minutes on foot, or `None` if no route could be found.
    async fn walk_minutes(&self, from: Coord, to: Coord) -> Option<u32>;
}

/// Looks up the last train out to a lodging and the first train back.
pub trait ScheduleProvider {
    async fn first_last_trains(
        &self,
        query: &ScheduleQuery,
    ) -> Result<FirstLastTrains, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn nights_are_at_least_one() {
        assert_eq!(nights_between(date(15), date(16)), 1);
        assert_eq!(nights_between(date(15), date(18)), 3);
        assert_eq!(nights_between(date(15), date(15)), 1);
        assert_eq!(nights_between(date(16), date(15)), 1);
    }

    #[test]
    fn query_nights() {
        let query = LodgingQuery {
            coord: Coord::new(35.68, 139.76),
            check_in: date(1),
            check_out: date(3),
            guests: 2,
            rooms: 1,
        };
        assert_eq!(query.nights(), 2);
    }
}
