//! Transit network: graph construction and route search.
//!
//! A [`Network`] owns the session's topology and, once built, its travel
//! time graph. The graph is built at most once; later build calls are
//! no-ops. Route search before the build is a programmer error and
//! returns [`RouteError::NetworkNotBuilt`].

mod graph;
mod search;
mod timetable;

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::LineId;
use crate::planner::PlannerConfig;
use crate::providers::TimetableProvider;
use crate::topology::Topology;

pub use graph::{Edge, EdgeSource, Graph, GraphBuilder};
pub use search::{RouteError, RouteParams, RouteResult, Routes};
pub use timetable::{Segment, TrainTrip, TripStop};

/// Session-wide transit network.
#[derive(Debug)]
pub struct Network {
    topology: Topology,
    graph: OnceLock<Graph>,
}

impl Network {
    /// Wrap a topology. The graph is not built yet.
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            graph: OnceLock::new(),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn is_built(&self) -> bool {
        self.graph.get().is_some()
    }

    /// The built graph, if any.
    pub fn graph(&self) -> Option<&Graph> {
        self.graph.get()
    }

    /// Build the graph from already-fetched trip samples.
    ///
    /// Returns `false` without touching the graph if it was already built.
    pub fn build_with(&self, trips: &HashMap<LineId, Vec<TrainTrip>>, config: &PlannerConfig) -> bool {
        if self.is_built() {
            debug!("network already built");
            return false;
        }
        let graph = self.assemble(trips, config);
        self.install(graph)
    }

    /// Fetch trip samples for every line and build the graph.
    ///
    /// A line whose samples cannot be fetched keeps its default edges.
    /// Returns `false` if the graph was already built.
    pub async fn build<P: TimetableProvider>(&self, provider: &P, config: &PlannerConfig) -> bool {
        if self.is_built() {
            debug!("network already built");
            return false;
        }

        let mut trips = HashMap::new();
        for (i, line) in self.topology.lines().iter().enumerate() {
            if i > 0 {
                sleep(config.line_delay()).await;
            }
            match provider.sample_trips(line).await {
                Ok(samples) => {
                    debug!(line = %line.id, trips = samples.len(), "fetched timetable samples");
                    trips.insert(line.id.clone(), samples);
                }
                Err(e) => {
                    warn!(line = %line.id, error = %e, "timetable samples unavailable, using defaults");
                }
            }
        }

        let graph = self.assemble(&trips, config);
        self.install(graph)
    }

    /// Best route from every reachable station to the `destination` group.
    pub fn find_routes(&self, destination: &str, config: &PlannerConfig) -> Result<Routes, RouteError> {
        let graph = self.graph.get().ok_or(RouteError::NetworkNotBuilt)?;
        Ok(search::find_routes(
            graph,
            &self.topology,
            destination,
            RouteParams {
                max_transfers: config.max_transfers,
                transfer_penalty_mins: config.transfer_penalty_mins,
            },
        ))
    }

    fn assemble(&self, trips: &HashMap<LineId, Vec<TrainTrip>>, config: &PlannerConfig) -> Graph {
        let mut builder = GraphBuilder::new(config);
        for line in self.topology.lines() {
            let stations = self.topology.stations_on(&line.id);
            if stations.len() < 2 {
                debug!(line = %line.id, "too few stations for edges, skipping line");
                continue;
            }
            builder.add_line(stations);
        }
        for line in self.topology.lines() {
            if let Some(samples) = trips.get(&line.id) {
                builder.add_trips(samples);
            }
        }
        builder.build()
    }

    fn install(&self, graph: Graph) -> bool {
        let stations = graph.station_count();
        let edges = graph.edge_count();
        if self.graph.set(graph).is_err() {
            return false;
        }
        info!(stations, edges, "network built");
        true
    }
}

async fn sleep(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
