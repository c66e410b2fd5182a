//! Configuration for network building and lodging search.

use std::time::Duration;

use crate::domain::Fare;

/// Configuration parameters for the planner.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum number of same-name station transfers in a route.
    pub max_transfers: usize,

    /// Minutes charged for a transfer.
    pub transfer_penalty_mins: u32,

    /// Minutes between neighbouring stations when no sample is available.
    pub default_edge_mins: u32,

    /// Sampled segments must be strictly longer than this (minutes).
    pub min_sample_mins: u32,

    /// Sampled segments must be strictly shorter than this (minutes).
    pub max_sample_mins: u32,

    /// Trips analyzed per line when refining edges.
    pub max_sampled_trips: usize,

    /// Fare used for pairs missing from the fare table.
    pub fallback_fare: Fare,

    /// Pause between lodging queries for successive station groups.
    pub group_delay_ms: u64,

    /// Pause between per-line requests while loading the network.
    pub line_delay_ms: u64,

    /// Concurrent walking-time lookups per batch.
    pub walk_batch_size: usize,

    /// Cheapest offers kept per station group.
    pub candidates_per_group: usize,
}

impl PlannerConfig {
    /// Create a configuration with the given search parameters and
    /// defaults for everything else.
    pub fn new(
        max_transfers: usize,
        transfer_penalty_mins: u32,
        group_delay_ms: u64,
        walk_batch_size: usize,
        candidates_per_group: usize,
    ) -> Self {
        Self {
            max_transfers,
            transfer_penalty_mins,
            group_delay_ms,
            walk_batch_size,
            candidates_per_group,
            ..Self::default()
        }
    }

    /// Returns the per-group delay as a Duration.
    pub fn group_delay(&self) -> Duration {
        Duration::from_millis(self.group_delay_ms)
    }

    /// Returns the per-line delay as a Duration.
    pub fn line_delay(&self) -> Duration {
        Duration::from_millis(self.line_delay_ms)
    }

    /// The same configuration without pauses between lines, for building
    /// from local data.
    pub fn without_line_delay(&self) -> Self {
        Self {
            line_delay_ms: 0,
            ..self.clone()
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_transfers: 1,
            transfer_penalty_mins: 5,
            default_edge_mins: 2,
            min_sample_mins: 0,
            max_sample_mins: 60,
            max_sampled_trips: 20,
            fallback_fare: Fare::new(200, 200),
            group_delay_ms: 1000,
            line_delay_ms: 200,
            walk_batch_size: 4,
            candidates_per_group: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.max_transfers, 1);
        assert_eq!(config.transfer_penalty_mins, 5);
        assert_eq!(config.default_edge_mins, 2);
        assert_eq!(config.min_sample_mins, 0);
        assert_eq!(config.max_sample_mins, 60);
        assert_eq!(config.max_sampled_trips, 20);
        assert_eq!(config.fallback_fare, Fare::new(200, 200));
        assert_eq!(config.walk_batch_size, 4);
        assert_eq!(config.candidates_per_group, 5);
    }

    #[test]
    fn duration_methods() {
        let config = PlannerConfig::default();

        assert_eq!(config.group_delay(), Duration::from_secs(1));
        assert_eq!(config.line_delay(), Duration::from_millis(200));
    }

    #[test]
    fn local_builds_skip_the_line_delay() {
        let config = PlannerConfig::default();
        let local = config.without_line_delay();

        assert_eq!(local.line_delay(), Duration::ZERO);
        assert_eq!(config.line_delay(), Duration::from_millis(200));
        assert_eq!(local.default_edge_mins, config.default_edge_mins);
        assert_eq!(local.max_sampled_trips, config.max_sampled_trips);
    }

    #[test]
    fn custom_config() {
        let config = PlannerConfig::new(0, 3, 0, 2, 10);

        assert_eq!(config.max_transfers, 0);
        assert_eq!(config.transfer_penalty_mins, 3);
        assert_eq!(config.group_delay(), Duration::ZERO);
        assert_eq!(config.walk_batch_size, 2);
        assert_eq!(config.candidates_per_group, 10);
        assert_eq!(config.default_edge_mins, 2);
    }
}
