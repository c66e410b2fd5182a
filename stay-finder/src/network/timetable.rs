//! Sampled train trips and the segment durations derived from them.

use serde::{Deserialize, Serialize};

use crate::domain::{ClockTime, StationId};

/// One stop of a sampled trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripStop {
    pub station: StationId,
    pub arrival: Option<ClockTime>,
    pub departure: Option<ClockTime>,
}

impl TripStop {
    pub fn new(station: StationId, arrival: Option<ClockTime>, departure: Option<ClockTime>) -> Self {
        Self {
            station,
            arrival,
            departure,
        }
    }

    /// Time the train reaches this stop. Timetables often give only a
    /// departure time for intermediate stops, which is used instead.
    fn reached_at(&self) -> Option<ClockTime> {
        self.arrival.or(self.departure)
    }
}

/// A train trip sampled from a line's timetable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainTrip {
    pub stops: Vec<TripStop>,
}

impl TrainTrip {
    pub fn new(stops: Vec<TripStop>) -> Self {
        Self { stops }
    }

    /// Whether the trip has at least one pair of consecutive stops.
    pub fn is_usable(&self) -> bool {
        self.stops.len() >= 2
    }

    /// Durations between consecutive stops.
    ///
    /// Pairs missing a departure at the first stop, or any time at the
    /// second, are skipped. Negative wall-clock differences wrap past
    /// midnight.
    pub fn segments(&self) -> Vec<Segment> {
        self.stops
            .windows(2)
            .filter_map(|pair| {
                let departure = pair[0].departure?;
                let arrival = pair[1].reached_at()?;
                Some(Segment {
                    from: pair[0].station.clone(),
                    to: pair[1].station.clone(),
                    minutes: u32::from(departure.minutes_until(arrival)),
                })
            })
            .collect()
    }
}

/// Travel time between two directly connected stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub from: StationId,
    pub to: StationId,
    pub minutes: u32,
}
