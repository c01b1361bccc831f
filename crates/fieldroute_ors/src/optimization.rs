use std::time::Duration;

use geo_types::Point;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OrsError;
use crate::{DRIVING_CAR_PROFILE, OrsCoordinate, coordinate};

pub const ORS_OPTIMIZATION_PATH: &str = "/optimization";

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationJob {
    pub id: usize,
    pub location: OrsCoordinate,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationVehicle {
    pub id: u32,
    pub profile: String,
    pub start: OrsCoordinate,
    pub end: OrsCoordinate,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationRequestBody {
    pub jobs: Vec<OptimizationJob>,
    pub vehicles: Vec<OptimizationVehicle>,
}

#[derive(Deserialize)]
struct OptimizationResponse {
    routes: Vec<OptimizationRoute>,
}

#[derive(Deserialize)]
struct OptimizationRoute {
    steps: Vec<OptimizationStep>,
}

/// Start and end steps carry no `job` field; only job visits do.
#[derive(Deserialize)]
struct OptimizationStep {
    job: Option<usize>,
}

pub struct OrsOptimizationClientParams {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Client for the ORS single-vehicle optimization endpoint.
///
/// Callers key each job with the index they want echoed back; the client
/// itself attaches no meaning to the ids.
pub struct OrsOptimizationClient {
    params: OrsOptimizationClientParams,
    client: reqwest::Client,
}

impl OrsOptimizationClient {
    pub fn new(params: OrsOptimizationClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    /// Sequences `jobs` for one vehicle that starts and ends at `depot`.
    /// Returns the job ids in visiting order, as extracted from the first
    /// returned route's steps.
    pub async fn sequence(
        &self,
        depot: Point,
        jobs: &[(usize, Point)],
    ) -> Result<Vec<usize>, OrsError> {
        let body = build_body(depot, jobs);
        let url = format!("{}{}", self.params.base_url, ORS_OPTIMIZATION_PATH);

        debug!(jobs = jobs.len(), "OrsOptimization: submitting request");

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
        let response: OptimizationResponse = serde_json::from_str(&text)?;

        extract_job_order(response)
    }
}

pub(crate) fn build_body(depot: Point, jobs: &[(usize, Point)]) -> OptimizationRequestBody {
    OptimizationRequestBody {
        jobs: jobs
            .iter()
            .map(|(id, point)| OptimizationJob {
                id: *id,
                location: coordinate(point),
            })
            .collect(),
        vehicles: vec![OptimizationVehicle {
            id: 1,
            profile: String::from(DRIVING_CAR_PROFILE),
            start: coordinate(&depot),
            end: coordinate(&depot),
        }],
    }
}

fn extract_job_order(response: OptimizationResponse) -> Result<Vec<usize>, OrsError> {
    let route = response.routes.into_iter().next().ok_or_else(|| {
        OrsError::MalformedResponse(String::from("optimization response contains no routes"))
    })?;

    Ok(route.steps.into_iter().filter_map(|step| step.job).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_uses_lon_lat_order_everywhere() {
        // lon and lat deliberately distinguishable
        let depot = Point::new(4.35, 50.85);
        let jobs = vec![(0, Point::new(3.72, 51.05))];

        let body = serde_json::to_value(build_body(depot, &jobs)).unwrap();

        assert_eq!(body["vehicles"][0]["start"], serde_json::json!([4.35, 50.85]));
        assert_eq!(body["vehicles"][0]["end"], serde_json::json!([4.35, 50.85]));
        assert_eq!(body["jobs"][0]["location"], serde_json::json!([3.72, 51.05]));
    }

    #[test]
    fn body_has_one_vehicle_starting_and_ending_at_depot() {
        let depot = Point::new(4.35, 50.85);
        let jobs = vec![(0, Point::new(3.72, 51.05)), (1, Point::new(5.57, 50.63))];

        let body = build_body(depot, &jobs);

        assert_eq!(body.vehicles.len(), 1);
        assert_eq!(body.vehicles[0].profile, "driving-car");
        assert_eq!(body.vehicles[0].start, body.vehicles[0].end);
        assert_eq!(body.jobs.len(), 2);
        assert_eq!(body.jobs[0].id, 0);
        assert_eq!(body.jobs[1].id, 1);
    }

    #[test]
    fn extract_skips_start_and_end_steps() {
        let response: OptimizationResponse = serde_json::from_str(
            r#"{
                "routes": [{
                    "steps": [
                        {"type": "start"},
                        {"type": "job", "job": 1},
                        {"type": "job", "job": 0},
                        {"type": "end"}
                    ]
                }]
            }"#,
        )
        .unwrap();

        let order = extract_job_order(response).unwrap();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn missing_routes_is_a_malformed_response() {
        let response: OptimizationResponse = serde_json::from_str(r#"{"routes": []}"#).unwrap();

        let error = extract_job_order(response).unwrap_err();
        assert!(matches!(error, OrsError::MalformedResponse(_)));
        assert!(!error.is_unavailable());
    }
}
