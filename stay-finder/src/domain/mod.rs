//! Domain types for the stay finder.
//!
//! This module contains the validated core types: station and line
//! identifiers, stations and station groups, fares, lodging offers and
//! wall-clock times. Identifiers enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod error;
mod line;
mod lodging;
mod station;
mod time;

pub use error::DomainError;
pub use line::{Line, RailDirection};
pub use lodging::{Fare, Lodging};
pub use station::{Coord, LineId, Station, StationGroup, StationId};
pub use time::{Calendar, ClockTime};
