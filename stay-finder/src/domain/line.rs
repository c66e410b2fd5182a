//! Railway lines and their named travel directions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{LineId, StationId};

/// A named end-to-end travel direction on a line, as used by station
/// timetables (e.g. `odpt.RailDirection:TokyoMetro.Asakusa`).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RailDirection(String);

impl RailDirection {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RailDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RailDirection({})", self.0)
    }
}

impl fmt::Display for RailDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A railway line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,

    /// Display name.
    pub name: String,

    /// Display colour as `#RRGGBB`.
    pub color: String,

    /// Origin for "stations from here" distances. Not used by route search.
    pub reference_station: StationId,

    /// Direction of travel towards the end of the ordered station list.
    pub direction_asc: RailDirection,

    /// Direction of travel towards the start of the ordered station list.
    pub direction_desc: RailDirection,
}

impl Line {
    /// Direction of travel from the station at `from_index` to the one at
    /// `to_index` in this line's station order.
    ///
    /// Returns `None` when both indices are equal.
    pub fn direction_between(&self, from_index: usize, to_index: usize) -> Option<&RailDirection> {
        if to_index > from_index {
            Some(&self.direction_asc)
        } else if to_index < from_index {
            Some(&self.direction_desc)
        } else {
            None
        }
    }
}
