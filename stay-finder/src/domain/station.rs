//! Station identifiers, stations and station groups.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Identifier of one line-specific station record.
///
/// A physical station served by three lines has three `StationId`s, one per
/// line (e.g. `odpt.Station:TokyoMetro.Ginza.Shibuya` and
/// `odpt.Station:TokyoMetro.Hanzomon.Shibuya`). Never empty.
///
/// # Examples
///
/// ```
/// use stay_finder::domain::StationId;
///
/// let id = StationId::parse("odpt.Station:TokyoMetro.Ginza.Shibuya").unwrap();
/// assert_eq!(id.as_str(), "odpt.Station:TokyoMetro.Ginza.Shibuya");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyIdentifier("station"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a railway line (e.g. `odpt.Railway:TokyoMetro.Ginza`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// Parse a line identifier, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyIdentifier("line"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lng: f64,
}

impl Coord {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One line-specific station record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,

    /// Display name. Stations on different lines sharing a name form a
    /// [`StationGroup`].
    pub name: String,

    /// Line this record belongs to.
    pub line: LineId,

    pub coord: Coord,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>, line: LineId, coord: Coord) -> Self {
        Self {
            id,
            name: name.into(),
            line,
            coord,
        }
    }
}

/// All station records sharing one display name.
///
/// Members keep the order in which they were first seen while loading the
/// topology (line catalog order, then station order along the line).
#[derive(Debug, Clone, PartialEq)]
pub struct StationGroup {
    pub name: String,
    pub members: Vec<Station>,
}

impl StationGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Iterate over member station ids.
    pub fn member_ids(&self) -> impl Iterator<Item = &StationId> {
        self.members.iter().map(|s| &s.id)
    }

    /// The member served by `line`, if any.
    pub fn member_on(&self, line: &LineId) -> Option<&Station> {
        self.members.iter().find(|s| &s.line == line)
    }

    /// Position used for lodging queries: the first member's coordinates.
    pub fn representative_coord(&self) -> Option<Coord> {
        self.members.first().map(|s| s.coord)
    }

    pub fn contains(&self, id: &StationId) -> bool {
        self.members.iter().any(|s| &s.id == id)
    }
}
