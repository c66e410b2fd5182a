//! Lodging search pipeline.
//!
//! Station groups are visited one at a time, destination first, with a
//! fixed pause between lodging queries. After each group the accumulated
//! candidates are re-ranked and handed to the caller as a [`Snapshot`].
//! Starting a newer run through the same [`RunRegistry`] makes the older
//! one stop at its next emission.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::fare::FareResolver;
use crate::network::{Network, RouteError};
use crate::providers::{
    FareTableProvider, LodgingProvider, LodgingQuery, ScheduleProvider, WalkingTimeProvider,
    nights_between,
};

use super::aggregate::{Aggregator, Candidate, best_routes_by_group, search_order};
use super::config::PlannerConfig;
use super::rank::{RankMode, ScoredResult, rank};

/// Error from lodging search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Route(#[from] RouteError),

    /// A newer run started before this one finished.
    #[error("search superseded by a newer run")]
    Superseded,
}

/// Request for lodging search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Destination station group name.
    pub destination: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub rooms: u32,
}

impl SearchRequest {
    pub fn new(
        destination: impl Into<String>,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
        rooms: u32,
    ) -> Self {
        Self {
            destination: destination.into(),
            check_in,
            check_out,
            guests,
            rooms,
        }
    }

    /// Nights of the stay, at least one.
    pub fn nights(&self) -> u32 {
        nights_between(self.check_in, self.check_out)
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.destination.trim().is_empty() {
            return Err(SearchError::InvalidRequest(
                "destination must not be empty".to_string(),
            ));
        }
        if self.guests == 0 {
            return Err(SearchError::InvalidRequest(
                "at least one guest is required".to_string(),
            ));
        }
        if self.rooms == 0 {
            return Err(SearchError::InvalidRequest(
                "at least one room is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Issues run tokens. Only the most recently issued token is current.
#[derive(Debug, Clone, Default)]
pub struct RunRegistry {
    current: Arc<AtomicU64>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run, superseding every earlier one.
    pub fn start(&self) -> RunToken {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        RunToken {
            generation,
            current: Arc::clone(&self.current),
        }
    }
}

/// Handle checked by a run before each emission.
#[derive(Debug, Clone)]
pub struct RunToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl RunToken {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

/// The authoritative state of a run at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Candidates ranked in the run's mode.
    pub results: Vec<ScoredResult>,

    /// Unranked candidates in discovery order.
    pub candidates: Vec<Candidate>,

    /// Station groups visited so far.
    pub processed: usize,

    /// Station groups to visit.
    pub total: usize,

    pub done: bool,

    #[serde(skip)]
    destination: String,
}

impl Snapshot {
    /// Rank the same candidates in another mode, without touching any
    /// provider.
    pub fn rerank(&self, mode: RankMode) -> Vec<ScoredResult> {
        rank(&self.candidates, mode, &self.destination)
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

/// Lodging search over a built network.
pub struct Planner<'a, F, L, W, S> {
    network: &'a Network,
    fares: &'a FareResolver<F>,
    lodging: &'a L,
    walking: &'a W,
    schedule: &'a S,
    config: &'a PlannerConfig,
}

impl<'a, F, L, W, S> Planner<'a, F, L, W, S>
where
    F: FareTableProvider,
    L: LodgingProvider,
    W: WalkingTimeProvider,
    S: ScheduleProvider,
{
    pub fn new(
        network: &'a Network,
        fares: &'a FareResolver<F>,
        lodging: &'a L,
        walking: &'a W,
        schedule: &'a S,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            network,
            fares,
            lodging,
            walking,
            schedule,
            config,
        }
    }

    /// Run a search, calling `emit` after every station group.
    ///
    /// Returns the final snapshot, which is also emitted with `done` set.
    /// A group whose lodging or schedule lookup fails is skipped. Returns
    /// [`SearchError::Superseded`] as soon as `token` stops being current.
    pub async fn search<E>(
        &self,
        request: &SearchRequest,
        mode: RankMode,
        token: &RunToken,
        mut emit: E,
    ) -> Result<Snapshot, SearchError>
    where
        E: FnMut(&Snapshot),
    {
        request.validate()?;

        let topology = self.network.topology();
        let destination = topology.group(&request.destination).ok_or_else(|| {
            SearchError::InvalidRequest(format!(
                "unknown destination station: {}",
                request.destination
            ))
        })?;

        let routes = self.network.find_routes(&destination.name, self.config)?;
        let origin = destination
            .members
            .first()
            .map(|s| s.id.clone())
            .ok_or_else(|| SearchError::InvalidRequest("destination has no stations".to_string()))?;
        let fares = self.fares.fares_from(&origin).await;

        let order = search_order(best_routes_by_group(&routes, topology), &destination.name);
        let total = order.len();
        debug!(destination = %destination.name, groups = total, "searching lodging");

        let aggregator = Aggregator::new(
            topology,
            destination,
            &fares,
            request,
            self.config,
            self.walking,
            self.schedule,
        )
        .with_mode(mode);

        let mut candidates: Vec<Candidate> = Vec::new();
        for (processed, (name, route)) in order.iter().enumerate() {
            if processed > 0 && !self.config.group_delay().is_zero() {
                tokio::time::sleep(self.config.group_delay()).await;
            }

            if let Some(group) = topology.group(name)
                && let Some(coord) = group.representative_coord()
            {
                let query = LodgingQuery {
                    coord,
                    check_in: request.check_in,
                    check_out: request.check_out,
                    guests: request.guests,
                    rooms: request.rooms,
                };
                match self.lodging.search(&query).await {
                    Ok(offers) => match aggregator.candidates(group, route, offers).await {
                        Ok(found) => {
                            debug!(group = %name, candidates = found.len(), "group processed");
                            candidates.extend(found);
                        }
                        Err(e) => warn!(group = %name, error = %e, "enrichment failed, skipping group"),
                    },
                    Err(e) => warn!(group = %name, error = %e, "lodging search failed, skipping group"),
                }
            }

            if !token.is_current() {
                debug!(group = %name, "run superseded");
                return Err(SearchError::Superseded);
            }
            emit(&self.snapshot(&candidates, mode, request, processed + 1, total, false));
        }

        if !token.is_current() {
            return Err(SearchError::Superseded);
        }
        let snapshot = self.snapshot(&candidates, mode, request, total, total, true);
        emit(&snapshot);
        info!(
            destination = %request.destination,
            groups = total,
            results = snapshot.results.len(),
            "search complete"
        );
        Ok(snapshot)
    }

    fn snapshot(
        &self,
        candidates: &[Candidate],
        mode: RankMode,
        request: &SearchRequest,
        processed: usize,
        total: usize,
        done: bool,
    ) -> Snapshot {
        Snapshot {
            results: rank(candidates, mode, &request.destination),
            candidates: candidates.to_vec(),
            processed,
            total,
            done,
            destination: request.destination.clone(),
        }
    }
}
