//! Vacancy search response DTOs and their conversion to [`Lodging`].
//!
//! Each hotel entry is an array of heterogeneous parts; the basic info and
//! the room plans are found by key, not by position.

use serde::Deserialize;

use crate::domain::{Coord, Lodging};

/// Fallback name for hotels without one.
const UNKNOWN_HOTEL: &str = "Unknown Hotel";

/// Top-level response. The hotel list appears as `hotels`, or as `items`
/// in some response formats.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VacancyResponse {
    pub hotels: Option<Vec<HotelItem>>,
    pub items: Option<Vec<HotelItem>>,
}

impl VacancyResponse {
    pub fn hotel_list(&self) -> &[HotelItem] {
        self.hotels
            .as_deref()
            .or(self.items.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HotelItem {
    #[serde(default)]
    pub hotel: Vec<HotelPart>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelPart {
    pub hotel_basic_info: Option<HotelBasicInfo>,
    pub room_info: Option<Vec<RoomInfo>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBasicInfo {
    pub hotel_name: Option<String>,
    pub hotel_information_url: Option<String>,
    pub hotel_image_url: Option<String>,
    pub review_average: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub room_basic_info: Option<RoomBasicInfo>,
    pub daily_charge: Option<DailyCharge>,
    pub room_image_url: Option<String>,
    pub room_thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBasicInfo {
    pub room_image_url: Option<String>,
    pub room_thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCharge {
    /// Price for the whole stay.
    pub stay_total: Option<f64>,
    /// Price per night.
    pub total: Option<f64>,
}

/// A priced room plan.
#[derive(Debug, Clone, PartialEq)]
struct PricedRoom {
    price: u32,
    image_url: Option<String>,
    thumbnail_url: Option<String>,
}

impl RoomInfo {
    /// Stay price: the stay total, else the nightly total times `nights`.
    /// Zero when neither is present.
    fn price(&self, nights: u32) -> u32 {
        let Some(charge) = &self.daily_charge else {
            return 0;
        };
        let price = match (charge.stay_total, charge.total) {
            (Some(stay), _) if stay > 0.0 => stay,
            (_, Some(night)) if night > 0.0 => night * f64::from(nights),
            _ => 0.0,
        };
        price.round() as u32
    }

    fn priced(&self, nights: u32) -> Option<PricedRoom> {
        let price = self.price(nights);
        if price == 0 {
            return None;
        }
        let basic = self.room_basic_info.as_ref();
        Some(PricedRoom {
            price,
            image_url: basic
                .and_then(|b| b.room_image_url.clone())
                .or_else(|| self.room_image_url.clone()),
            thumbnail_url: basic
                .and_then(|b| b.room_thumbnail_url.clone())
                .or_else(|| self.room_thumbnail_url.clone()),
        })
    }
}

impl HotelItem {
    /// The hotel priced at its cheapest room plan, or `None` if it has no
    /// basic info or no priced plan.
    pub fn to_lodging(&self, nights: u32) -> Option<Lodging> {
        let basic = self.hotel.iter().find_map(|p| p.hotel_basic_info.as_ref())?;
        let rooms = self.hotel.iter().find_map(|p| p.room_info.as_ref())?;

        // First of equally cheap plans.
        let cheapest = rooms
            .iter()
            .filter_map(|r| r.priced(nights))
            .reduce(|min, r| if r.price < min.price { r } else { min })?;

        let mut lodging = Lodging::new(
            basic.hotel_name.clone().unwrap_or_else(|| UNKNOWN_HOTEL.to_string()),
            cheapest.price,
        );
        lodging.rating = basic.review_average;
        lodging.coord = match (basic.latitude, basic.longitude) {
            (Some(lat), Some(lng)) => Some(Coord::new(lat, lng)),
            _ => None,
        };
        lodging.url = basic.hotel_information_url.clone();
        lodging.image_url = basic.hotel_image_url.clone();
        lodging.room_image_url = cheapest.image_url;
        lodging.room_thumbnail_url = cheapest.thumbnail_url;
        Some(lodging)
    }
}

/// All priced hotels in the response, cheapest first.
pub fn convert_response(response: &VacancyResponse, nights: u32) -> Vec<Lodging> {
    let mut lodgings: Vec<Lodging> = response
        .hotel_list()
        .iter()
        .filter_map(|item| item.to_lodging(nights))
        .collect();
    lodgings.sort_by_key(|l| l.price);
    lodgings
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "pagingInfo": {"recordCount": 3},
        "hotels": [
            {"hotel": [
                {"hotelBasicInfo": {
                    "hotelNo": 1,
                    "hotelName": "Hotel Aoyama",
                    "hotelInformationUrl": "https://example.test/1",
                    "hotelImageUrl": "https://example.test/1.jpg",
                    "reviewAverage": 4.2,
                    "latitude": 35.67,
                    "longitude": 139.72
                }},
                {"roomInfo": [
                    {"roomBasicInfo": {"roomImageUrl": "https://example.test/1a.jpg"},
                     "dailyCharge": {"stayTotal": 18000, "total": 9000}},
                    {"roomBasicInfo": {"roomThumbnailUrl": "https://example.test/1b-thumb.jpg"},
                     "roomImageUrl": "https://example.test/1b.jpg",
                     "dailyCharge": {"total": 7000}},
                    {"dailyCharge": {"stayTotal": 0}}
                ]}
            ]},
            {"hotel": [
                {"hotelBasicInfo": {"reviewAverage": 3.5}},
                {"roomInfo": [{"dailyCharge": {"stayTotal": 9000}}]}
            ]},
            {"hotel": [
                {"hotelBasicInfo": {"hotelName": "No Rooms"}},
                {"roomInfo": [{"roomBasicInfo": {}}]}
            ]},
            {"hotel": [
                {"roomInfo": [{"dailyCharge": {"stayTotal": 5000}}]}
            ]}
        ]
    }"#;

    #[test]
    fn cheapest_plan_prices_the_hotel() {
        let response: VacancyResponse = serde_json::from_str(RESPONSE).unwrap();
        let lodgings = convert_response(&response, 2);

        assert_eq!(lodgings.len(), 2);

        assert_eq!(lodgings[0].name, UNKNOWN_HOTEL);
        assert_eq!(lodgings[0].price, 9_000);
        assert_eq!(lodgings[0].rating, Some(3.5));
        assert_eq!(lodgings[0].coord, None);

        let aoyama = &lodgings[1];
        assert_eq!(aoyama.name, "Hotel Aoyama");
        assert_eq!(aoyama.price, 14_000);
        assert_eq!(aoyama.coord, Some(Coord::new(35.67, 139.72)));
        assert_eq!(aoyama.url.as_deref(), Some("https://example.test/1"));
        assert_eq!(aoyama.room_image_url.as_deref(), Some("https://example.test/1b.jpg"));
        assert_eq!(
            aoyama.room_thumbnail_url.as_deref(),
            Some("https://example.test/1b-thumb.jpg")
        );
    }

    #[test]
    fn items_key_is_accepted() {
        let response: VacancyResponse = serde_json::from_str(
            r#"{"items": [{"hotel": [
                {"hotelBasicInfo": {"hotelName": "A"}},
                {"roomInfo": [{"dailyCharge": {"stayTotal": 4000}}]}
            ]}]}"#,
        )
        .unwrap();
        let lodgings = convert_response(&response, 1);
        assert_eq!(lodgings.len(), 1);
        assert_eq!(lodgings[0].name, "A");
    }

    #[test]
    fn missing_hotel_list_is_empty() {
        let response: VacancyResponse = serde_json::from_str(r#"{"error": "not_found"}"#).unwrap();
        assert!(convert_response(&response, 1).is_empty());
    }
}
