//! Lodging vacancy search.
//!
//! Queries the vacancy search API around a station position and prices
//! each hotel at its cheapest room plan for the whole stay. Results are
//! cached for the rest of the day.

mod cache;
mod client;
mod types;

pub use cache::{LodgingCache, LodgingCacheConfig};
pub use client::{LodgingConfig, RakutenClient};
pub use types::{VacancyResponse, convert_response};
