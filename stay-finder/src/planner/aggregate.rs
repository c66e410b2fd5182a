//! Joining route results with lodging offers.
//!
//! Route search reports one result per station. Lodging is searched per
//! station group, so results are first collapsed to the fastest member of
//! each group, then each group's offers become [`Candidate`]s carrying the
//! route, the fare and the total cost of the stay.

use std::collections::HashMap;
use std::fmt;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Coord, Fare, LineId, Lodging, StationGroup, StationId};
use crate::fare::FareMap;
use crate::network::{RouteResult, Routes};
use crate::providers::{ProviderError, ScheduleProvider, WalkingTimeProvider};
use crate::schedule::{FirstLastTrains, ScheduleQuery};
use crate::topology::Topology;

use super::config::PlannerConfig;
use super::rank::RankMode;
use super::search::SearchRequest;

/// Identifies a candidate within one search: `{station}_{index}`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(station: &StationId, index: usize) -> Self {
        Self(format!("{station}_{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CandidateId({})", self.0)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One lodging offer bound to a station group and its route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,

    /// Station group name.
    pub group: String,

    /// Group member the route reaches.
    pub station: StationId,

    pub lodging: Lodging,

    /// One-way fare to the destination.
    pub fare: Fare,

    pub train_minutes: u32,
    pub walk_minutes: u32,
    pub transfers: usize,
    pub lines: Vec<LineId>,
    pub stops: usize,

    /// Stations between this group's station and the reference station on
    /// its line, when it lies on a line the reference station serves.
    pub stations_from_reference: Option<usize>,

    /// Lodging price plus the round-trip IC fare for every guest and night.
    pub total_cost: u64,

    /// Only looked up for routes without transfers.
    pub schedule: Option<FirstLastTrains>,
}

impl Candidate {
    /// Train plus walking time.
    pub fn travel_minutes(&self) -> u32 {
        self.train_minutes + self.walk_minutes
    }

    /// Lodging price plus one round trip at the IC fare.
    pub fn price_with_round_trip(&self) -> u64 {
        u64::from(self.lodging.price) + 2 * u64::from(self.fare.ic)
    }
}

/// Lodging price plus the round-trip fare for every guest and night.
pub fn total_cost(price: u32, fare: Fare, guests: u32, nights: u32) -> u64 {
    u64::from(price) + u64::from(fare.ic) * 2 * u64::from(guests) * u64::from(nights)
}

/// Fastest route per station group.
///
/// Stations outside any group are dropped. Equal times resolve to the
/// smaller station id so the choice does not depend on map order.
pub fn best_routes_by_group(routes: &Routes, topology: &Topology) -> HashMap<String, RouteResult> {
    let mut best: HashMap<String, RouteResult> = HashMap::new();
    for (id, route) in routes {
        let Some(group) = topology.group_of(id) else {
            debug!(station = %id, "station has no group, dropping route");
            continue;
        };
        match best.get(&group.name) {
            Some(current)
                if (current.total_minutes, &current.station) <= (route.total_minutes, &route.station) => {}
            _ => {
                best.insert(group.name.clone(), route.clone());
            }
        }
    }
    best
}

/// Order in which groups are queried for lodging: the destination first,
/// then everything else by ascending travel time.
pub fn search_order(
    best: HashMap<String, RouteResult>,
    destination: &str,
) -> Vec<(String, RouteResult)> {
    let mut order: Vec<_> = best.into_iter().collect();
    order.sort_by(|(a_name, a), (b_name, b)| {
        (a_name != destination)
            .cmp(&(b_name != destination))
            .then(a.total_minutes.cmp(&b.total_minutes))
            .then_with(|| a_name.cmp(b_name))
    });
    order
}

/// Turns one group's lodging offers into candidates.
pub struct Aggregator<'a, W, S> {
    topology: &'a Topology,
    destination: &'a StationGroup,
    fares: &'a FareMap,
    request: &'a SearchRequest,
    config: &'a PlannerConfig,
    walking: &'a W,
    schedule: &'a S,
    mode: RankMode,
}

impl<'a, W: WalkingTimeProvider, S: ScheduleProvider> Aggregator<'a, W, S> {
    pub fn new(
        topology: &'a Topology,
        destination: &'a StationGroup,
        fares: &'a FareMap,
        request: &'a SearchRequest,
        config: &'a PlannerConfig,
        walking: &'a W,
        schedule: &'a S,
    ) -> Self {
        Self {
            topology,
            destination,
            fares,
            request,
            config,
            walking,
            schedule,
            mode: RankMode::default(),
        }
    }

    /// Ranking mode the candidates are gathered for.
    pub fn with_mode(mut self, mode: RankMode) -> Self {
        self.mode = mode;
        self
    }

    /// Offers kept per group: every offer in rating mode, the
    /// `candidates_per_group` cheapest otherwise.
    fn offer_cap(&self) -> Option<usize> {
        match self.mode {
            RankMode::Rating => None,
            RankMode::Price | RankMode::Cospa => Some(self.config.candidates_per_group),
        }
    }

    /// Candidates for one group, cheapest offers first.
    ///
    /// Outside rating mode only the `candidates_per_group` cheapest offers
    /// are kept. A failed schedule lookup fails the whole group.
    pub async fn candidates(
        &self,
        group: &StationGroup,
        route: &RouteResult,
        mut offers: Vec<Lodging>,
    ) -> Result<Vec<Candidate>, ProviderError> {
        offers.sort_by_key(|l| l.price);
        if let Some(cap) = self.offer_cap() {
            offers.truncate(cap);
        }
        if offers.is_empty() {
            return Ok(Vec::new());
        }

        let fare = if group.name == self.destination.name {
            Fare::ZERO
        } else {
            self.fares.get(&route.station)
        };

        let schedule = match self.schedule_query(route) {
            Some(query) => Some(self.schedule.first_last_trains(&query).await?),
            None => None,
        };

        let station_coord = self
            .topology
            .station(&route.station)
            .map(|s| s.coord)
            .or_else(|| group.representative_coord());
        let walks = self.walk_minutes(&offers, station_coord).await;
        let stations_from_reference = self.topology.stops_from_reference(&route.station);

        let guests = self.request.guests;
        let nights = self.request.nights();
        let candidates = offers
            .into_iter()
            .zip(walks)
            .enumerate()
            .map(|(i, (lodging, walk_minutes))| Candidate {
                id: CandidateId::new(&route.station, i),
                group: group.name.clone(),
                station: route.station.clone(),
                total_cost: total_cost(lodging.price, fare, guests, nights),
                lodging,
                fare,
                train_minutes: route.total_minutes,
                walk_minutes,
                transfers: route.transfers,
                lines: route.lines.clone(),
                stops: route.stops,
                stations_from_reference,
                schedule: schedule.clone(),
            })
            .collect();

        Ok(candidates)
    }

    /// First/last train query for a route without transfers.
    ///
    /// Directions come from the order of the lodging station and the
    /// destination's member on the same line.
    fn schedule_query(&self, route: &RouteResult) -> Option<ScheduleQuery> {
        if route.transfers != 0 {
            return None;
        }
        let line_id = route.lines.first()?;
        let line = self.topology.line(line_id)?;
        let target = self.destination.member_on(line_id)?;
        let hotel_index = self.topology.station_index(line_id, &route.station)?;
        let target_index = self.topology.station_index(line_id, &target.id)?;

        let direction_to_destination = line.direction_between(hotel_index, target_index)?;
        let direction_to_hotel = line.direction_between(target_index, hotel_index)?;

        Some(ScheduleQuery {
            destination_station: target.id.clone(),
            hotel_station: route.station.clone(),
            direction_to_hotel: direction_to_hotel.clone(),
            direction_to_destination: direction_to_destination.clone(),
            date: self.request.check_in,
            travel_minutes: route.total_minutes,
        })
    }

    /// Walking minutes from each offer to the station, in offer order.
    ///
    /// Lookups run in batches of `walk_batch_size`. Missing positions and
    /// failed lookups count as zero.
    async fn walk_minutes(&self, offers: &[Lodging], station: Option<Coord>) -> Vec<u32> {
        let Some(station) = station else {
            return vec![0; offers.len()];
        };

        let mut minutes = Vec::with_capacity(offers.len());
        for batch in offers.chunks(self.config.walk_batch_size.max(1)) {
            let futures: Vec<_> = batch
                .iter()
                .map(|lodging| async move {
                    match lodging.coord {
                        Some(from) => self.walking.walk_minutes(from, station).await.unwrap_or(0),
                        None => 0,
                    }
                })
                .collect();
            minutes.extend(join_all(futures).await);
        }
        minutes
    }
}
