use geo_types::Point;
use serde::{Deserialize, Serialize};

/// One assigned location, as produced by the offline import job.
///
/// Coordinates are stored as latitude/longitude fields; `point()` converts
/// to the x = longitude, y = latitude convention used on every wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: i64,
    pub name: String,
    pub address_line_1: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Stop {
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

impl From<&Stop> for Point {
    fn from(stop: &Stop) -> Self {
        stop.point()
    }
}
