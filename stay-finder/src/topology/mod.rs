//! Static topology: lines, their ordered stations, and station groups.
//!
//! Station groups are computed once from display-name equality when the
//! topology is assembled and never change afterwards.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{Line, LineId, Station, StationGroup, StationId};
use crate::providers::TopologyProvider;

/// Lines, stations and station groups for one session.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    lines: Vec<Line>,
    stations_by_line: HashMap<LineId, Vec<Station>>,
    stations: HashMap<StationId, Station>,
    groups: Vec<StationGroup>,
    group_by_name: HashMap<String, usize>,
    group_by_station: HashMap<StationId, usize>,
}

impl Topology {
    /// Assemble a topology from lines and their ordered stations.
    ///
    /// Lines without stations are dropped. A station id already seen (on
    /// this or an earlier line) is ignored, so every station belongs to
    /// exactly one group.
    pub fn from_lines(lines: impl IntoIterator<Item = (Line, Vec<Station>)>) -> Self {
        let mut topology = Topology::default();

        for (line, stations) in lines {
            let mut ordered = Vec::with_capacity(stations.len());

            for station in stations {
                if topology.stations.contains_key(&station.id) {
                    debug!(station = %station.id, line = %line.id, "duplicate station ignored");
                    continue;
                }

                let group_idx = match topology.group_by_name.get(&station.name) {
                    Some(&idx) => idx,
                    None => {
                        topology.groups.push(StationGroup::new(station.name.clone()));
                        let idx = topology.groups.len() - 1;
                        topology.group_by_name.insert(station.name.clone(), idx);
                        idx
                    }
                };

                topology.groups[group_idx].members.push(station.clone());
                topology.group_by_station.insert(station.id.clone(), group_idx);
                topology.stations.insert(station.id.clone(), station.clone());
                ordered.push(station);
            }

            if ordered.is_empty() {
                continue;
            }
            topology.stations_by_line.insert(line.id.clone(), ordered);
            topology.lines.push(line);
        }

        topology
    }

    /// Load every line from a provider.
    ///
    /// A line whose stations cannot be fetched, or that comes back empty, is
    /// skipped; the remaining lines still load. `line_delay` is slept before
    /// each request after the first.
    pub async fn load<P: TopologyProvider>(provider: &P, line_delay: Duration) -> Self {
        let mut loaded = Vec::new();

        for (i, line) in provider.list_lines().into_iter().enumerate() {
            if i > 0 && !line_delay.is_zero() {
                tokio::time::sleep(line_delay).await;
            }

            match provider.stations_of(&line).await {
                Ok(stations) if stations.is_empty() => {
                    warn!(line = %line.id, "no stations returned, skipping line");
                }
                Ok(stations) => {
                    debug!(line = %line.id, stations = stations.len(), "loaded line");
                    loaded.push((line, stations));
                }
                Err(e) => {
                    warn!(line = %line.id, error = %e, "failed to load line, skipping");
                }
            }
        }

        let topology = Self::from_lines(loaded);
        info!(
            lines = topology.lines.len(),
            stations = topology.stations.len(),
            groups = topology.groups.len(),
            "topology loaded"
        );
        topology
    }

    /// Lines in load order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, id: &LineId) -> Option<&Line> {
        self.lines.iter().find(|l| &l.id == id)
    }

    /// Ordered stations of a line (empty if unknown).
    pub fn stations_on(&self, line: &LineId) -> &[Station] {
        self.stations_by_line
            .get(line)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Position of a station in its line's order.
    pub fn station_index(&self, line: &LineId, id: &StationId) -> Option<usize> {
        self.stations_on(line).iter().position(|s| &s.id == id)
    }

    /// Number of stops between a station and its line's reference station.
    ///
    /// Falls back to the plain index when the reference station is not on
    /// the line.
    pub fn stops_from_reference(&self, id: &StationId) -> Option<usize> {
        let station = self.stations.get(id)?;
        let line = self.line(&station.line)?;
        let idx = self.station_index(&line.id, id)?;
        match self.station_index(&line.id, &line.reference_station) {
            Some(reference) => Some(idx.abs_diff(reference)),
            None => Some(idx),
        }
    }

    /// All station groups in first-seen order.
    pub fn groups(&self) -> &[StationGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&StationGroup> {
        self.group_by_name.get(name).map(|&idx| &self.groups[idx])
    }

    /// The group a station belongs to.
    pub fn group_of(&self, id: &StationId) -> Option<&StationGroup> {
        self.group_by_station.get(id).map(|&idx| &self.groups[idx])
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::providers::ProviderError;

    #[test]
    fn groups_by_display_name() {
        let topology = Topology::from_lines([
            line_with("G", &["A", "B", "C"]),
            line_with("M", &["D", "B", "E"]),
        ]);

        assert_eq!(topology.station_count(), 6);
        assert_eq!(topology.groups().len(), 5);

        let hub = topology.group("B").unwrap();
        let ids: Vec<&str> = hub.member_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["G.B", "M.B"]);

        assert_eq!(topology.group_of(&sid("M.B")).unwrap().name, "B");
        assert!(topology.group("Z").is_none());
    }

    #[test]
    fn every_station_in_exactly_one_group() {
        let topology = Topology::from_lines([
            line_with("G", &["A", "B", "C"]),
            line_with("M", &["B", "C", "D"]),
        ]);

        let total: usize = topology.groups().iter().map(|g| g.members.len()).sum();
        assert_eq!(total, topology.station_count());
    }

    #[test]
    fn duplicate_station_ids_are_ignored() {
        let (line, mut stations) = line_with("G", &["A", "B"]);
        stations.push(stations[0].clone());
        let topology = Topology::from_lines([(line, stations)]);

        assert_eq!(topology.stations_on(&lid("G")).len(), 2);
        assert_eq!(topology.group("A").unwrap().members.len(), 1);
    }

    #[test]
    fn empty_lines_are_dropped() {
        let topology = Topology::from_lines([
            (line("G", "G.A"), Vec::new()),
            line_with("M", &["A"]),
        ]);
        assert_eq!(topology.lines().len(), 1);
        assert!(topology.line(&lid("G")).is_none());
    }

    #[test]
    fn index_and_reference_distance() {
        let (mut line, stations) = line_with("G", &["A", "B", "C", "D"]);
        line.reference_station = sid("G.C");
        let topology = Topology::from_lines([(line, stations)]);

        assert_eq!(topology.station_index(&lid("G"), &sid("G.D")), Some(3));
        assert_eq!(topology.stops_from_reference(&sid("G.A")), Some(2));
        assert_eq!(topology.stops_from_reference(&sid("G.C")), Some(0));
        assert_eq!(topology.stops_from_reference(&sid("X.A")), None);
    }

    struct FlakyProvider;

    impl TopologyProvider for FlakyProvider {
        fn list_lines(&self) -> Vec<Line> {
            vec![line("G", "G.A"), line("BAD", "BAD.A"), line("EMPTY", "EMPTY.A"), line("M", "M.B")]
        }

        async fn stations_of(&self, line: &Line) -> Result<Vec<Station>, ProviderError> {
            match line.id.as_str() {
                "G" => Ok(stations("G", &["A", "B"])),
                "M" => Ok(stations("M", &["B", "C"])),
                "EMPTY" => Ok(Vec::new()),
                _ => Err(ProviderError::Api {
                    status: 500,
                    message: "boom".into(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn load_skips_failing_lines() {
        let topology = Topology::load(&FlakyProvider, Duration::ZERO).await;

        let ids: Vec<&str> = topology.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["G", "M"]);
        assert_eq!(topology.group("B").unwrap().members.len(), 2);
    }
}
