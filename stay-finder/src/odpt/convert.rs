//! Conversion from ODPT DTOs to domain types.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{ClockTime, Coord, Fare, Line, Station, StationId};
use crate::fare::FareRow;
use crate::network::{TrainTrip, TripStop};
use crate::schedule::StationDeparture;

use super::types::{RailwayDto, RailwayFareDto, StationDto, StationTimetableDto, TrainTimetableDto};

/// Stations of `line` in the railway's published order.
///
/// Falls back to the order of the station resource when the railway has
/// no station order. Stations without coordinates are dropped.
pub fn order_stations(line: &Line, railway: Option<&RailwayDto>, stations: Vec<StationDto>) -> Vec<Station> {
    let order: Vec<&str> = match railway {
        Some(r) if !r.station_order.is_empty() => {
            let mut items: Vec<_> = r.station_order.iter().enumerate().collect();
            items.sort_by_key(|(pos, item)| (item.index.unwrap_or(u32::MAX), *pos));
            items.into_iter().map(|(_, item)| item.station.as_str()).collect()
        }
        _ => stations.iter().map(|s| s.same_as.as_str()).collect(),
    };

    let by_id: HashMap<&str, &StationDto> = stations.iter().map(|s| (s.same_as.as_str(), s)).collect();

    order
        .into_iter()
        .filter_map(|id| by_id.get(id).copied())
        .filter_map(|dto| convert_station(line, dto))
        .collect()
}

fn convert_station(line: &Line, dto: &StationDto) -> Option<Station> {
    let (Some(lat), Some(lng)) = (dto.lat, dto.long) else {
        debug!(station = %dto.same_as, "station has no coordinates, skipping");
        return None;
    };
    let id = StationId::parse(&dto.same_as).ok()?;
    let name = dto
        .station_title
        .as_ref()
        .and_then(|t| t.ja.clone().or_else(|| t.en.clone()))
        .or_else(|| dto.title.clone())
        .unwrap_or_else(|| short_name(&dto.same_as).to_string());
    Some(Station::new(id, name, line.id.clone(), Coord::new(lat, lng)))
}

// "odpt.Station:TokyoMetro.Ginza.Shibuya" -> "Shibuya"
fn short_name(id: &str) -> &str {
    id.rsplit('.').next().unwrap_or(id)
}

fn parse_time(s: Option<&String>) -> Option<ClockTime> {
    s.and_then(|t| ClockTime::parse_hhmm(t).ok())
}

/// A train's stops. Stops with no station are dropped.
pub fn convert_trip(dto: &TrainTimetableDto) -> TrainTrip {
    let stops = dto
        .stops
        .iter()
        .filter_map(|stop| {
            let station = stop
                .departure_station
                .as_ref()
                .or(stop.arrival_station.as_ref())?;
            let station = StationId::parse(station).ok()?;
            Some(TripStop::new(
                station,
                parse_time(stop.arrival_time.as_ref()),
                parse_time(stop.departure_time.as_ref()),
            ))
        })
        .collect();
    TrainTrip::new(stops)
}

/// Fare rows with both ends and an IC fare. A missing ticket fare takes
/// the IC fare.
pub fn convert_fares(dtos: &[RailwayFareDto]) -> Vec<FareRow> {
    dtos.iter()
        .filter_map(|dto| {
            let from = StationId::parse(dto.from_station.as_deref()?).ok()?;
            let to = StationId::parse(dto.to_station.as_deref()?).ok()?;
            let ic = dto.ic_card_fare?;
            Some(FareRow {
                from,
                to,
                fare: Fare::new(ic, dto.ticket_fare.unwrap_or(ic)),
            })
        })
        .collect()
}

/// Departures of the first timetable in the response, in listed order.
pub fn convert_station_timetable(dtos: &[StationTimetableDto]) -> Vec<StationDeparture> {
    let Some(timetable) = dtos.first() else {
        return Vec::new();
    };
    timetable
        .departures
        .iter()
        .filter_map(|obj| {
            Some(StationDeparture {
                departure: parse_time(obj.departure_time.as_ref())?,
                destination: obj.destination_station.first().cloned().unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::test_support::line;

    fn stations_json() -> Vec<StationDto> {
        serde_json::from_str(
            r#"[
                {"owl:sameAs": "X.C", "dc:title": "C", "geo:lat": 35.3, "geo:long": 139.3},
                {"owl:sameAs": "X.A", "odpt:stationTitle": {"ja": "エー", "en": "A"}, "geo:lat": 35.1, "geo:long": 139.1},
                {"owl:sameAs": "X.B", "dc:title": "B", "geo:lat": 35.2, "geo:long": 139.2},
                {"owl:sameAs": "X.D", "dc:title": "D"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn stations_follow_railway_order() {
        let railway: RailwayDto = serde_json::from_str(
            r#"{
                "owl:sameAs": "X",
                "odpt:stationOrder": [
                    {"odpt:index": 2, "odpt:station": "X.B"},
                    {"odpt:index": 1, "odpt:station": "X.A"},
                    {"odpt:index": 3, "odpt:station": "X.C"},
                    {"odpt:index": 4, "odpt:station": "X.D"}
                ]
            }"#,
        )
        .unwrap();

        let stations = order_stations(&line("X", "X.A"), Some(&railway), stations_json());

        let ids: Vec<_> = stations.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["X.A", "X.B", "X.C"]);
        assert_eq!(stations[0].name, "エー");
        assert_eq!(stations[1].name, "B");
        assert_eq!(stations[0].line.as_str(), "X");
    }

    #[test]
    fn stations_without_railway_keep_resource_order() {
        let stations = order_stations(&line("X", "X.A"), None, stations_json());
        let ids: Vec<_> = stations.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["X.C", "X.A", "X.B"]);
    }

    #[test]
    fn trip_stops_use_either_station_key() {
        let dto: TrainTimetableDto = serde_json::from_str(
            r#"{
                "odpt:railDirection": "Asc",
                "odpt:trainTimetableObject": [
                    {"odpt:departureTime": "10:00", "odpt:departureStation": "X.A"},
                    {"odpt:departureTime": "10:02", "odpt:departureStation": "X.B"},
                    {"odpt:arrivalTime": "10:05", "odpt:arrivalStation": "X.C"},
                    {"odpt:arrivalTime": "10:09"}
                ]
            }"#,
        )
        .unwrap();

        let trip = convert_trip(&dto);
        let segments = trip.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].minutes, 2);
        assert_eq!(segments[1].to.as_str(), "X.C");
        assert_eq!(segments[1].minutes, 3);
    }

    #[test]
    fn fares_need_both_ends_and_ic() {
        let dtos: Vec<RailwayFareDto> = serde_json::from_str(
            r#"[
                {"odpt:fromStation": "X.A", "odpt:toStation": "X.B", "odpt:icCardFare": 178, "odpt:ticketFare": 180},
                {"odpt:fromStation": "X.A", "odpt:toStation": "X.C", "odpt:icCardFare": 209},
                {"odpt:fromStation": "X.A", "odpt:ticketFare": 180},
                {"odpt:fromStation": "X.A", "odpt:toStation": "X.D"}
            ]"#,
        )
        .unwrap();

        let rows = convert_fares(&dtos);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fare, Fare::new(178, 180));
        assert_eq!(rows[1].fare, Fare::new(209, 209));
    }

    #[test]
    fn station_timetable_keeps_listed_order() {
        let dtos: Vec<StationTimetableDto> = serde_json::from_str(
            r#"[{
                "odpt:stationTimetableObject": [
                    {"odpt:departureTime": "05:01", "odpt:destinationStation": ["X.Z"]},
                    {"odpt:departureTime": "23:59"},
                    {"odpt:departureTime": "00:12", "odpt:destinationStation": ["X.M"]},
                    {"odpt:destinationStation": ["X.Z"]}
                ]
            }]"#,
        )
        .unwrap();

        let departures = convert_station_timetable(&dtos);
        assert_eq!(departures.len(), 3);
        assert_eq!(departures[0].destination, "X.Z");
        assert_eq!(departures[1].destination, "");
        assert_eq!(departures[2].departure, ClockTime::parse_hhmm("00:12").unwrap());
        assert!(convert_station_timetable(&[]).is_empty());
    }
}
