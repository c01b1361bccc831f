pub mod directions;
pub mod error;
pub mod optimization;

/// A coordinate pair in OpenRouteService wire order: `[longitude, latitude]`.
pub type OrsCoordinate = [f64; 2];

pub(crate) fn coordinate(point: &geo_types::Point) -> OrsCoordinate {
    [point.x(), point.y()]
}

pub const ORS_BASE_URL: &str = "https://api.openrouteservice.org";
pub const DRIVING_CAR_PROFILE: &str = "driving-car";
