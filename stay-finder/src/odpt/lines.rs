//! Tokyo Metro line catalog.

use crate::domain::{Line, LineId, RailDirection, StationId};

/// Operator id used in fare queries.
pub const TOKYO_METRO_OPERATOR: &str = "odpt.Operator:TokyoMetro";

struct LineEntry {
    id: &'static str,
    name: &'static str,
    color: &'static str,
    reference: &'static str,
    asc: &'static str,
    desc: &'static str,
}

const TOKYO_METRO: [LineEntry; 9] = [
    LineEntry {
        id: "odpt.Railway:TokyoMetro.Marunouchi",
        name: "Marunouchi",
        color: "#F62E36",
        reference: "odpt.Station:TokyoMetro.Marunouchi.Shinjuku",
        asc: "odpt.RailDirection:TokyoMetro.Ikebukuro",
        desc: "odpt.RailDirection:TokyoMetro.Ogikubo",
    },
    LineEntry {
        id: "odpt.Railway:TokyoMetro.Ginza",
        name: "Ginza",
        color: "#FF9500",
        reference: "odpt.Station:TokyoMetro.Ginza.Shibuya",
        asc: "odpt.RailDirection:TokyoMetro.Asakusa",
        desc: "odpt.RailDirection:TokyoMetro.Shibuya",
    },
    LineEntry {
        id: "odpt.Railway:TokyoMetro.Hibiya",
        name: "Hibiya",
        color: "#B5B5AC",
        reference: "odpt.Station:TokyoMetro.Hibiya.Ueno",
        asc: "odpt.RailDirection:TokyoMetro.KitaSenju",
        desc: "odpt.RailDirection:TokyoMetro.NakaMeguro",
    },
    LineEntry {
        id: "odpt.Railway:TokyoMetro.Tozai",
        name: "Tozai",
        color: "#009BBF",
        reference: "odpt.Station:TokyoMetro.Tozai.Nakano",
        asc: "odpt.RailDirection:TokyoMetro.NishiFunabashi",
        desc: "odpt.RailDirection:TokyoMetro.Nakano",
    },
    LineEntry {
        id: "odpt.Railway:TokyoMetro.Chiyoda",
        name: "Chiyoda",
        color: "#00BB85",
        reference: "odpt.Station:TokyoMetro.Chiyoda.Omotesando",
        asc: "odpt.RailDirection:TokyoMetro.KitaAyase",
        desc: "odpt.RailDirection:TokyoMetro.YoyogiUehara",
    },
    LineEntry {
        id: "odpt.Railway:TokyoMetro.Yurakucho",
        name: "Yurakucho",
        color: "#C1A470",
        reference: "odpt.Station:TokyoMetro.Yurakucho.Ikebukuro",
        asc: "odpt.RailDirection:TokyoMetro.ShinKiba",
        desc: "odpt.RailDirection:TokyoMetro.Wakoshi",
    },
    LineEntry {
        id: "odpt.Railway:TokyoMetro.Hanzomon",
        name: "Hanzomon",
        color: "#8F76D6",
        reference: "odpt.Station:TokyoMetro.Hanzomon.Shibuya",
        asc: "odpt.RailDirection:TokyoMetro.Oshiage",
        desc: "odpt.RailDirection:TokyoMetro.Shibuya",
    },
    LineEntry {
        id: "odpt.Railway:TokyoMetro.Namboku",
        name: "Namboku",
        color: "#00AC9B",
        reference: "odpt.Station:TokyoMetro.Namboku.Meguro",
        asc: "odpt.RailDirection:TokyoMetro.AkabaneIwabuchi",
        desc: "odpt.RailDirection:TokyoMetro.Meguro",
    },
    LineEntry {
        id: "odpt.Railway:TokyoMetro.Fukutoshin",
        name: "Fukutoshin",
        color: "#9C5E31",
        reference: "odpt.Station:TokyoMetro.Fukutoshin.Shibuya",
        asc: "odpt.RailDirection:TokyoMetro.Shibuya",
        desc: "odpt.RailDirection:TokyoMetro.Wakoshi",
    },
];

/// The nine Tokyo Metro lines, in catalog order.
///
/// `direction_asc` runs towards the end of each line's station order as
/// published by the railway resource.
pub fn tokyo_metro_lines() -> Vec<Line> {
    TOKYO_METRO
        .iter()
        .filter_map(|entry| {
            Some(Line {
                id: LineId::parse(entry.id).ok()?,
                name: entry.name.to_string(),
                color: entry.color.to_string(),
                reference_station: StationId::parse(entry.reference).ok()?,
                direction_asc: RailDirection::new(entry.asc),
                direction_desc: RailDirection::new(entry.desc),
            })
        })
        .collect()
}
