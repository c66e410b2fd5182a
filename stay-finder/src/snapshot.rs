//! Network snapshot on disk.
//!
//! A snapshot holds each line's ordered stations and its sampled trips, so
//! a network can be rebuilt without talking to the transit data API. It
//! implements the same provider traits as the live client.

use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{Line, LineId, Station};
use crate::network::TrainTrip;
use crate::providers::{ProviderError, TimetableProvider, TopologyProvider};
use crate::topology::Topology;

/// One line and its stations in line order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub line: Line,
    pub stations: Vec<Station>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Unix timestamp when the snapshot was captured.
    pub captured_at_secs: u64,

    pub lines: Vec<LineSnapshot>,

    #[serde(default)]
    pub trips: HashMap<LineId, Vec<TrainTrip>>,
}

impl NetworkSnapshot {
    /// Snapshot of a loaded topology and its trip samples.
    pub fn from_parts(topology: &Topology, trips: HashMap<LineId, Vec<TrainTrip>>) -> Self {
        let lines = topology
            .lines()
            .iter()
            .map(|line| LineSnapshot {
                line: line.clone(),
                stations: topology.stations_on(&line.id).to_vec(),
            })
            .collect();
        Self {
            captured_at_secs: unix_now(),
            lines,
            trips,
        }
    }

    /// Fetch topology and trip samples from a live provider.
    ///
    /// Lines that fail are left out (topology) or keep no samples
    /// (timetable), as when building the network directly.
    pub async fn capture<P>(provider: &P, line_delay: Duration) -> Self
    where
        P: TopologyProvider + TimetableProvider,
    {
        let topology = Topology::load(provider, line_delay).await;

        let mut trips = HashMap::new();
        for (i, line) in topology.lines().iter().enumerate() {
            if i > 0 && !line_delay.is_zero() {
                tokio::time::sleep(line_delay).await;
            }
            match provider.sample_trips(line).await {
                Ok(samples) => {
                    trips.insert(line.id.clone(), samples);
                }
                Err(e) => warn!(line = %line.id, error = %e, "no trip samples for snapshot"),
            }
        }

        Self::from_parts(&topology, trips)
    }

    /// Read a snapshot file.
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ProviderError::Io {
            message: format!("failed to read snapshot {}: {}", path.display(), e),
        })?;
        let snapshot: Self =
            serde_json::from_str(&contents).map_err(|e| ProviderError::json(e, &contents))?;
        info!(
            path = %path.display(),
            lines = snapshot.lines.len(),
            "network snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Write the snapshot, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> Result<(), ProviderError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ProviderError::Io {
                message: format!("failed to create snapshot directory: {}", e),
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ProviderError::Io {
            message: format!("failed to serialize snapshot: {}", e),
        })?;

        std::fs::write(path, json).map_err(|e| ProviderError::Io {
            message: format!("failed to write snapshot {}: {}", path.display(), e),
        })?;

        debug!(path = %path.display(), "network snapshot saved");
        Ok(())
    }

    /// Age of the snapshot relative to now.
    pub fn age(&self) -> Duration {
        Duration::from_secs(unix_now().saturating_sub(self.captured_at_secs))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl TopologyProvider for NetworkSnapshot {
    fn list_lines(&self) -> Vec<Line> {
        self.lines.iter().map(|l| l.line.clone()).collect()
    }

    async fn stations_of(&self, line: &Line) -> Result<Vec<Station>, ProviderError> {
        Ok(self
            .lines
            .iter()
            .find(|l| l.line.id == line.id)
            .map(|l| l.stations.clone())
            .unwrap_or_default())
    }
}

impl TimetableProvider for NetworkSnapshot {
    async fn sample_trips(&self, line: &Line) -> Result<Vec<TrainTrip>, ProviderError> {
        Ok(self.trips.get(&line.id).cloned().unwrap_or_default())
    }
}
