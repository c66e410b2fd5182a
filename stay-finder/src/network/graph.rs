//! Weighted adjacency between directly connected stations.
//!
//! Edges start as a fixed default between neighbours in each line's station
//! order. Sampled timetable segments then replace those defaults; once an
//! edge holds a sampled value, later samples for the same directed pair are
//! ignored.

use std::collections::HashMap;

use tracing::trace;

use crate::domain::{Station, StationId};
use crate::planner::PlannerConfig;

use super::timetable::TrainTrip;

/// Where an edge's weight came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSource {
    /// Fixed weight between neighbours in line order.
    Default,
    /// First valid value observed in a sampled trip.
    Sampled,
}

/// A directed edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub to: StationId,
    pub minutes: u32,
    pub source: EdgeSource,
}

/// Directed adjacency: station → outgoing edges in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: HashMap<StationId, Vec<Edge>>,
}

impl Graph {
    /// Outgoing edges of a station, in insertion order.
    pub fn edges_from(&self, id: &StationId) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Minutes from `from` to `to`, if directly connected.
    pub fn weight(&self, from: &StationId, to: &StationId) -> Option<u32> {
        self.edge(from, to).map(|e| e.minutes)
    }

    pub fn edge(&self, from: &StationId, to: &StationId) -> Option<&Edge> {
        self.edges_from(from).iter().find(|e| &e.to == to)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn station_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    fn insert_default(&mut self, from: &StationId, to: &StationId, minutes: u32) {
        let edges = self.adjacency.entry(from.clone()).or_default();
        if !edges.iter().any(|e| &e.to == to) {
            edges.push(Edge {
                to: to.clone(),
                minutes,
                source: EdgeSource::Default,
            });
        }
    }

    fn insert_sampled(&mut self, from: &StationId, to: &StationId, minutes: u32) {
        let edges = self.adjacency.entry(from.clone()).or_default();
        match edges.iter_mut().find(|e| &e.to == to) {
            None => edges.push(Edge {
                to: to.clone(),
                minutes,
                source: EdgeSource::Sampled,
            }),
            Some(edge) if edge.source == EdgeSource::Default => {
                edge.minutes = minutes;
                edge.source = EdgeSource::Sampled;
            }
            Some(_) => {}
        }
    }
}

/// Builds a [`Graph`] from line station orders and sampled trips.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    graph: Graph,
    default_edge_mins: u32,
    min_sample_mins: u32,
    max_sample_mins: u32,
    max_trips_per_line: usize,
}

impl GraphBuilder {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            graph: Graph::default(),
            default_edge_mins: config.default_edge_mins,
            min_sample_mins: config.min_sample_mins,
            max_sample_mins: config.max_sample_mins,
            max_trips_per_line: config.max_sampled_trips,
        }
    }

    /// Add default edges in both directions between neighbours in `stations`.
    pub fn add_line(&mut self, stations: &[Station]) -> &mut Self {
        for pair in stations.windows(2) {
            self.graph
                .insert_default(&pair[0].id, &pair[1].id, self.default_edge_mins);
            self.graph
                .insert_default(&pair[1].id, &pair[0].id, self.default_edge_mins);
        }
        self
    }

    /// Apply segments from a line's sampled trips.
    ///
    /// Only the first `max_sampled_trips` usable trips are analyzed.
    /// Segments outside the open interval (`min_sample_mins`,
    /// `max_sample_mins`) are discarded as noise. Each kept segment is
    /// recorded in both directions.
    pub fn add_trips(&mut self, trips: &[TrainTrip]) -> &mut Self {
        let usable = trips
            .iter()
            .filter(|t| t.is_usable())
            .take(self.max_trips_per_line);

        for trip in usable {
            for segment in trip.segments() {
                if segment.minutes <= self.min_sample_mins || segment.minutes >= self.max_sample_mins
                {
                    trace!(
                        from = %segment.from,
                        to = %segment.to,
                        minutes = segment.minutes,
                        "discarding sampled segment"
                    );
                    continue;
                }
                self.graph
                    .insert_sampled(&segment.from, &segment.to, segment.minutes);
                self.graph
                    .insert_sampled(&segment.to, &segment.from, segment.minutes);
            }
        }
        self
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClockTime;
    use crate::network::TripStop;
    use crate::topology::test_support::{sid, stations};

    fn trip(stops: &[(&str, &str)]) -> TrainTrip {
        TrainTrip::new(
            stops
                .iter()
                .map(|(id, dep)| {
                    let time = ClockTime::parse_hhmm(dep).unwrap();
                    TripStop::new(sid(id), Some(time), Some(time))
                })
                .collect(),
        )
    }

    fn builder() -> GraphBuilder {
        GraphBuilder::new(&PlannerConfig::default())
    }

    #[test]
    fn default_edges_are_bidirectional() {
        let mut b = builder();
        b.add_line(&stations("L", &["S1", "S2", "S3"]));
        let graph = b.build();

        assert_eq!(graph.weight(&sid("L.S1"), &sid("L.S2")), Some(2));
        assert_eq!(graph.weight(&sid("L.S2"), &sid("L.S1")), Some(2));
        assert_eq!(graph.weight(&sid("L.S2"), &sid("L.S3")), Some(2));
        assert_eq!(graph.weight(&sid("L.S1"), &sid("L.S3")), None);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn samples_replace_defaults() {
        let mut b = builder();
        b.add_line(&stations("L", &["S1", "S2"]));
        b.add_trips(&[trip(&[("L.S1", "10:00"), ("L.S2", "10:03")])]);
        let graph = b.build();

        let edge = graph.edge(&sid("L.S1"), &sid("L.S2")).unwrap();
        assert_eq!(edge.minutes, 3);
        assert_eq!(edge.source, EdgeSource::Sampled);
        assert_eq!(graph.weight(&sid("L.S2"), &sid("L.S1")), Some(3));
    }

    #[test]
    fn first_sample_wins() {
        let mut b = builder();
        b.add_trips(&[
            trip(&[("A", "10:00"), ("B", "10:03")]),
            trip(&[("A", "11:00"), ("B", "11:07")]),
            trip(&[("B", "12:00"), ("A", "12:09")]),
        ]);
        let graph = b.build();

        assert_eq!(graph.weight(&sid("A"), &sid("B")), Some(3));
        assert_eq!(graph.weight(&sid("B"), &sid("A")), Some(3));
    }

    #[test]
    fn noisy_samples_are_discarded() {
        let mut b = builder();
        b.add_line(&stations("L", &["S1", "S2"]));
        b.add_trips(&[
            trip(&[("L.S1", "10:00"), ("L.S2", "10:00")]),
            trip(&[("L.S1", "10:00"), ("L.S2", "11:00")]),
        ]);
        let graph = b.build();

        let edge = graph.edge(&sid("L.S1"), &sid("L.S2")).unwrap();
        assert_eq!(edge.source, EdgeSource::Default);
        assert_eq!(edge.minutes, 2);
    }

    #[test]
    fn midnight_wrap_is_kept() {
        let mut b = builder();
        b.add_trips(&[trip(&[("A", "23:58"), ("B", "00:01")])]);
        assert_eq!(b.build().weight(&sid("A"), &sid("B")), Some(3));
    }

    #[test]
    fn trip_cap_limits_analysis() {
        let config = PlannerConfig {
            max_sampled_trips: 1,
            ..PlannerConfig::default()
        };
        let mut b = GraphBuilder::new(&config);
        b.add_trips(&[
            trip(&[("A", "10:00")]),
            trip(&[("A", "10:00"), ("B", "10:04")]),
            trip(&[("C", "10:00"), ("D", "10:04")]),
        ]);
        let graph = b.build();

        assert_eq!(graph.weight(&sid("A"), &sid("B")), Some(4));
        assert_eq!(graph.weight(&sid("C"), &sid("D")), None);
    }

    #[test]
    fn identical_input_builds_identical_graphs() {
        let build = || {
            let mut b = builder();
            b.add_line(&stations("L", &["S1", "S2", "S3"]));
            b.add_line(&stations("M", &["S2", "S4"]));
            b.add_trips(&[trip(&[("L.S1", "10:00"), ("L.S2", "10:03")])]);
            b.build()
        };
        assert_eq!(build(), build());
    }
}
