use std::time::Duration;

use geo_types::Point;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OrsError;
use crate::{DRIVING_CAR_PROFILE, OrsCoordinate, coordinate};

#[derive(Debug, Clone, Serialize)]
pub struct DirectionsRequestBody {
    pub coordinates: Vec<OrsCoordinate>,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    features: Vec<DirectionsFeature>,
}

#[derive(Deserialize)]
struct DirectionsFeature {
    geometry: DirectionsGeometry,
}

#[derive(Deserialize)]
struct DirectionsGeometry {
    coordinates: Vec<OrsCoordinate>,
}

pub struct OrsDirectionsClientParams {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Client for the ORS directions endpoint (GeoJSON flavor).
pub struct OrsDirectionsClient {
    params: OrsDirectionsClientParams,
    client: reqwest::Client,
}

impl OrsDirectionsClient {
    pub fn new(params: OrsDirectionsClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    /// Fetches the drivable path through `waypoints` in the given order.
    /// The returned line follows road geometry, so it is usually denser than
    /// the waypoints and need not pass through them verbatim.
    pub async fn path(&self, waypoints: &[Point]) -> Result<Vec<OrsCoordinate>, OrsError> {
        let body = DirectionsRequestBody {
            coordinates: waypoints.iter().map(coordinate).collect(),
        };
        let url = format!(
            "{}/v2/directions/{}/geojson",
            self.params.base_url, DRIVING_CAR_PROFILE
        );

        debug!(waypoints = waypoints.len(), "OrsDirections: submitting request");

        let response = self
            .client
            .post(url)
            .timeout(self.params.timeout)
            .header("Authorization", &self.params.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(OrsError::Api { status, message });
        }

        let text = response.text().await?;
        let response: DirectionsResponse = serde_json::from_str(&text)?;

        extract_line(response)
    }
}

fn extract_line(response: DirectionsResponse) -> Result<Vec<OrsCoordinate>, OrsError> {
    let feature = response.features.into_iter().next().ok_or_else(|| {
        OrsError::MalformedResponse(String::from("directions response contains no features"))
    })?;

    Ok(feature.geometry.coordinates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_serializes_waypoints_as_lon_lat_pairs() {
        let waypoints = vec![Point::new(4.35, 50.85), Point::new(3.72, 51.05)];
        let body = DirectionsRequestBody {
            coordinates: waypoints.iter().map(coordinate).collect(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["coordinates"],
            serde_json::json!([[4.35, 50.85], [3.72, 51.05]])
        );
    }

    #[test]
    fn extract_takes_the_first_feature_line() {
        let response: DirectionsResponse = serde_json::from_str(
            r#"{
                "features": [{
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[4.35, 50.85], [4.40, 50.90], [3.72, 51.05]]
                    }
                }]
            }"#,
        )
        .unwrap();

        let line = extract_line(response).unwrap();
        assert_eq!(line.len(), 3);
        assert_eq!(line[0], [4.35, 50.85]);
        assert_eq!(line[2], [3.72, 51.05]);
    }

    #[test]
    fn missing_features_is_a_malformed_response() {
        let response: DirectionsResponse = serde_json::from_str(r#"{"features": []}"#).unwrap();

        let error = extract_line(response).unwrap_err();
        assert!(matches!(error, OrsError::MalformedResponse(_)));
    }
}
