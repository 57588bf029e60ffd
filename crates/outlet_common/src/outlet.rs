//! Outlet records and validated coordinates.

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// A physical outlet as served by `GET /outlets`.
///
/// The catalog id is kept for import and ordering but never serialized, so
/// the listing always carries exactly the six documented fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    #[serde(default, skip_serializing)]
    pub id: Option<i64>,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub waze_link: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Outlet {
    /// Outlet with coordinates and no optional metadata
    pub fn at(name: impl Into<String>, address: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: address.into(),
            operating_hours: None,
            waze_link: None,
            latitude: Some(lat),
            longitude: Some(lon),
        }
    }

    /// Validated position, or None when coordinates are missing or out of range
    pub fn position(&self) -> Option<Position> {
        Position::new(self.latitude?, self.longitude?)
    }
}

/// A WGS84 coordinate pair known to be in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    /// geo points are (x = lon, y = lat)
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    /// Great-circle distance in kilometres
    pub fn distance_km(&self, other: &Position) -> f64 {
        self.point().haversine_distance(&other.point()) / 1000.0
    }

    /// Bit-exact key used to deduplicate positions
    pub(crate) fn key(&self) -> (u64, u64) {
        (self.latitude.to_bits(), self.longitude.to_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_rejects_out_of_range() {
        assert!(Position::new(91.0, 0.0).is_none());
        assert!(Position::new(0.0, -180.5).is_none());
        assert!(Position::new(f64::NAN, 101.0).is_none());
        assert!(Position::new(3.139, 101.6869).is_some());
    }

    #[test]
    fn test_outlet_without_coordinates_has_no_position() {
        let mut outlet = Outlet::at("Subway Bangsar", "Jalan Telawi", 3.13, 101.67);
        assert!(outlet.position().is_some());

        outlet.longitude = None;
        assert!(outlet.position().is_none());
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = Position::new(0.0, 0.0).unwrap();
        let b = Position::new(1.0, 0.0).unwrap();
        let d = a.distance_km(&b);
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_listing_serializes_six_fields_without_id() {
        let mut outlet = Outlet::at("Subway KLCC", "Suria KLCC", 3.158, 101.712);
        outlet.id = Some(7);

        let json = serde_json::to_value(&outlet).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        assert!(obj.get("id").is_none());
        assert!(obj["operating_hours"].is_null());
        assert!(obj["waze_link"].is_null());
    }

    #[test]
    fn test_deserialize_with_missing_nullable_fields() {
        let outlet: Outlet =
            serde_json::from_str(r#"{"name":"Subway Ampang","address":"Jalan Ampang"}"#).unwrap();
        assert_eq!(outlet.name, "Subway Ampang");
        assert!(outlet.position().is_none());
    }
}
