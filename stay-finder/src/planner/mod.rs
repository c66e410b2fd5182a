//! Lodging search: candidate aggregation, baseline selection and ranking.
//!
//! The pipeline in [`Planner::search`] walks station groups reachable from
//! the destination, joins each group's lodging offers with its route and
//! fare, and re-ranks the growing candidate list after every group.

mod aggregate;
mod baseline;
mod config;
mod rank;
mod search;


pub use aggregate::{Aggregator, Candidate, CandidateId, best_routes_by_group, search_order, total_cost};
pub use baseline::{select_baseline, select_cospa_baseline};
pub use config::PlannerConfig;
pub use rank::{RankMode, Savings, ScoredResult, annotate, rank};
pub use search::{Planner, RunRegistry, RunToken, SearchError, SearchRequest, Snapshot};
