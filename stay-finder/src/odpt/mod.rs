//! Open Data for Public Transportation (ODPT) client.
//!
//! Key characteristics of the ODPT API:
//! - Resources are JSON-LD style, keyed by prefixed names such as
//!   `owl:sameAs` and `odpt:stationOrder`
//! - Times are local `HH:MM`; trains after midnight are listed as `00:xx`
//! - Fare rows are only published in one direction for some station pairs

mod client;
mod convert;
mod lines;
mod types;

pub use client::{OdptClient, OdptConfig};
pub use convert::{convert_fares, convert_station_timetable, convert_trip, order_stations};
pub use lines::{TOKYO_METRO_OPERATOR, tokyo_metro_lines};
pub use types::{
    RailwayDto, RailwayFareDto, StationDto, StationOrderDto, StationTimetableDto,
    StationTimetableObjectDto, TitleDto, TrainStopDto, TrainTimetableDto,
};
