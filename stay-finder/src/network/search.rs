//! Bounded-transfer route search.
//!
//! Runs Dijkstra backward from every station of the destination group at
//! once. Moving along a line follows graph edges; moving between stations
//! of the same group is a transfer, allowed while the path is under the
//! transfer budget.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace};

use crate::domain::{LineId, StationId};
use crate::topology::Topology;

use super::graph::Graph;

/// Error from route search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Route search was called before the graph was built.
    #[error("transit network has not been built")]
    NetworkNotBuilt,
}

/// Best route from one station to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResult {
    /// Station this result is for.
    pub station: StationId,

    /// Minutes from this station to the destination.
    pub total_minutes: u32,

    /// Transfers used.
    pub transfers: usize,

    /// Lines traversed, starting from the destination side, without
    /// duplicates.
    pub lines: Vec<LineId>,

    /// Destination-group station the route ends at.
    pub source: StationId,

    /// Same-line hops between stations.
    pub stops: usize,
}

/// Route results keyed by station id.
pub type Routes = HashMap<StationId, RouteResult>;

/// Search parameters.
#[derive(Debug, Clone, Copy)]
pub struct RouteParams {
    pub max_transfers: usize,
    pub transfer_penalty_mins: u32,
}

/// A path waiting in the frontier.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frontier {
    minutes: u32,
    seq: u64,
    station: StationId,
    transfers: usize,
    lines: Vec<LineId>,
    source: StationId,
    stops: usize,
}

// Min-heap on (minutes, seq): earliest time first, then insertion order.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .minutes
            .cmp(&self.minutes)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Heap plus the best tentative time pushed per station.
struct Queue {
    heap: BinaryHeap<Frontier>,
    best: HashMap<StationId, u32>,
    seq: u64,
}

impl Queue {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            best: HashMap::new(),
            seq: 0,
        }
    }

    /// Push unless an equal or better time is already queued or settled.
    fn offer(
        &mut self,
        station: &StationId,
        minutes: u32,
        transfers: usize,
        lines: Vec<LineId>,
        source: &StationId,
        stops: usize,
    ) {
        if self.best.get(station).is_some_and(|&b| b <= minutes) {
            return;
        }
        self.best.insert(station.clone(), minutes);
        self.heap.push(Frontier {
            minutes,
            seq: self.seq,
            station: station.clone(),
            transfers,
            lines,
            source: source.clone(),
            stops,
        });
        self.seq += 1;
    }
}

/// Find the best route from every reachable station to `destination`.
///
/// Returns an empty map if no group has that name.
pub(super) fn find_routes(
    graph: &Graph,
    topology: &Topology,
    destination: &str,
    params: RouteParams,
) -> Routes {
    let mut settled = Routes::new();

    let Some(group) = topology.group(destination) else {
        debug!(destination, "unknown destination group");
        return settled;
    };

    let mut queue = Queue::new();
    for member in &group.members {
        queue.offer(&member.id, 0, 0, vec![member.line.clone()], &member.id, 0);
    }

    while let Some(current) = queue.heap.pop() {
        if settled.contains_key(&current.station) {
            continue;
        }

        trace!(
            station = %current.station,
            minutes = current.minutes,
            transfers = current.transfers,
            "settled"
        );

        // Same-line moves.
        for edge in graph.edges_from(&current.station) {
            if settled.contains_key(&edge.to) {
                continue;
            }
            queue.offer(
                &edge.to,
                current.minutes + edge.minutes,
                current.transfers,
                current.lines.clone(),
                &current.source,
                current.stops + 1,
            );
        }

        // Transfers to other stations of the same group.
        if current.transfers < params.max_transfers
            && let Some(here) = topology.group_of(&current.station)
        {
            for sibling in &here.members {
                if sibling.id == current.station || settled.contains_key(&sibling.id) {
                    continue;
                }
                let mut lines = current.lines.clone();
                if !lines.contains(&sibling.line) {
                    lines.push(sibling.line.clone());
                }
                queue.offer(
                    &sibling.id,
                    current.minutes + params.transfer_penalty_mins,
                    current.transfers + 1,
                    lines,
                    &current.source,
                    current.stops,
                );
            }
        }

        settled.insert(
            current.station.clone(),
            RouteResult {
                station: current.station,
                total_minutes: current.minutes,
                transfers: current.transfers,
                lines: current.lines,
                source: current.source,
                stops: current.stops,
            },
        );
    }

    debug!(destination, reached = settled.len(), "route search complete");
    settled
}
