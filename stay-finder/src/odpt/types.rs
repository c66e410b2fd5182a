//! ODPT API response DTOs.
//!
//! Field names follow the linked-data keys used by the API. Almost every
//! field is optional because the API omits rather than nulls.

use serde::Deserialize;

/// `odpt:Railway`
#[derive(Debug, Clone, Deserialize)]
pub struct RailwayDto {
    #[serde(rename = "owl:sameAs")]
    pub same_as: String,

    #[serde(rename = "odpt:stationOrder", default)]
    pub station_order: Vec<StationOrderDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationOrderDto {
    #[serde(rename = "odpt:index")]
    pub index: Option<u32>,

    #[serde(rename = "odpt:station")]
    pub station: String,
}

/// `odpt:Station`
#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    #[serde(rename = "owl:sameAs")]
    pub same_as: String,

    #[serde(rename = "dc:title")]
    pub title: Option<String>,

    #[serde(rename = "odpt:stationTitle")]
    pub station_title: Option<TitleDto>,

    #[serde(rename = "geo:lat")]
    pub lat: Option<f64>,

    #[serde(rename = "geo:long")]
    pub long: Option<f64>,
}

/// Multilingual title.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleDto {
    pub ja: Option<String>,
    pub en: Option<String>,
}

/// `odpt:TrainTimetable`
#[derive(Debug, Clone, Deserialize)]
pub struct TrainTimetableDto {
    #[serde(rename = "odpt:railDirection")]
    pub rail_direction: Option<String>,

    #[serde(rename = "odpt:trainTimetableObject", default)]
    pub stops: Vec<TrainStopDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainStopDto {
    #[serde(rename = "odpt:departureTime")]
    pub departure_time: Option<String>,

    #[serde(rename = "odpt:departureStation")]
    pub departure_station: Option<String>,

    #[serde(rename = "odpt:arrivalTime")]
    pub arrival_time: Option<String>,

    #[serde(rename = "odpt:arrivalStation")]
    pub arrival_station: Option<String>,
}

/// `odpt:RailwayFare`
#[derive(Debug, Clone, Deserialize)]
pub struct RailwayFareDto {
    #[serde(rename = "odpt:fromStation")]
    pub from_station: Option<String>,

    #[serde(rename = "odpt:toStation")]
    pub to_station: Option<String>,

    #[serde(rename = "odpt:icCardFare")]
    pub ic_card_fare: Option<u32>,

    #[serde(rename = "odpt:ticketFare")]
    pub ticket_fare: Option<u32>,
}

/// `odpt:StationTimetable`
#[derive(Debug, Clone, Deserialize)]
pub struct StationTimetableDto {
    #[serde(rename = "odpt:stationTimetableObject", default)]
    pub departures: Vec<StationTimetableObjectDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationTimetableObjectDto {
    #[serde(rename = "odpt:departureTime")]
    pub departure_time: Option<String>,

    #[serde(rename = "odpt:destinationStation", default)]
    pub destination_station: Vec<String>,
}
