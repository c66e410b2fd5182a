//! Fares and lodging offers.

use serde::{Deserialize, Serialize};

use super::Coord;

/// One-way fare between two stations, in yen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fare {
    /// Stored-value (IC) card fare.
    pub ic: u32,
    /// Paper ticket fare.
    pub ticket: u32,
}

impl Fare {
    pub const ZERO: Fare = Fare { ic: 0, ticket: 0 };

    pub const fn new(ic: u32, ticket: u32) -> Self {
        Self { ic, ticket }
    }
}

/// A lodging offer as returned by a lodging provider.
///
/// Only `price` and `rating` feed the ranking; the rest is carried through
/// for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lodging {
    pub name: String,

    /// Total price for the requested stay, in yen.
    pub price: u32,

    /// Average guest rating (0.0-5.0).
    pub rating: Option<f64>,

    pub coord: Option<Coord>,

    pub url: Option<String>,
    pub image_url: Option<String>,
    pub room_image_url: Option<String>,
    pub room_thumbnail_url: Option<String>,
}

impl Lodging {
    /// An offer with only a name and price.
    pub fn new(name: impl Into<String>, price: u32) -> Self {
        Self {
            name: name.into(),
            price,
            rating: None,
            coord: None,
            url: None,
            image_url: None,
            room_image_url: None,
            room_thumbnail_url: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_coord(mut self, coord: Coord) -> Self {
        self.coord = Some(coord);
        self
    }

    /// Rating used for ordering; missing ratings count as zero.
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rating_is_zero() {
        assert_eq!(Lodging::new("A", 5000).rating_or_zero(), 0.0);
        assert_eq!(Lodging::new("A", 5000).with_rating(4.2).rating_or_zero(), 4.2);
    }

    #[test]
    fn zero_fare() {
        assert_eq!(Fare::ZERO, Fare::new(0, 0));
    }
}
