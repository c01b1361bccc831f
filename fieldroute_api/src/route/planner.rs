use std::collections::HashSet;

use fieldroute_ors::OrsCoordinate;
use fieldroute_ors::directions::OrsDirectionsClient;
use fieldroute_ors::error::OrsError;
use fieldroute_ors::optimization::OrsOptimizationClient;
use fieldroute_store::stop::Stop;
use fieldroute_store::store::StopStore;
use geo_types::Point;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("upstream service unavailable: {0}")]
    UpstreamUnavailable(#[source] OrsError),

    #[error("upstream contract violation: {0}")]
    UpstreamContractViolation(String),
}

/// Sequencing seam. Production impl is the ORS optimization client; tests
/// substitute counters and canned orders.
pub trait Optimizer {
    async fn sequence(&self, depot: Point, jobs: &[(usize, Point)]) -> Result<Vec<usize>, OrsError>;
}

/// Path-geometry seam over the ORS directions client.
pub trait Directions {
    async fn path(&self, waypoints: &[Point]) -> Result<Vec<OrsCoordinate>, OrsError>;
}

impl Optimizer for OrsOptimizationClient {
    async fn sequence(&self, depot: Point, jobs: &[(usize, Point)]) -> Result<Vec<usize>, OrsError> {
        OrsOptimizationClient::sequence(self, depot, jobs).await
    }
}

impl Directions for OrsDirectionsClient {
    async fn path(&self, waypoints: &[Point]) -> Result<Vec<OrsCoordinate>, OrsError> {
        OrsDirectionsClient::path(self, waypoints).await
    }
}

#[derive(Debug)]
pub struct PlannedRoute {
    pub stops: Vec<Stop>,
    pub geometry: Vec<OrsCoordinate>,
}

/// Runs the whole optimization pipeline for one request: resolve the ids,
/// sequence the non-depot stops, reconcile the optimizer's job order back to
/// stops, and fetch the drivable geometry for the resulting visiting order.
///
/// The first id is the depot; the vehicle starts and ends there. The
/// pipeline is single-attempt and all-or-nothing: any stage failure aborts
/// the request with no partial result.
pub async fn plan_route<S, O, D>(
    store: &S,
    optimizer: &O,
    directions: &D,
    stop_ids: &[i64],
) -> Result<PlannedRoute, RouteError>
where
    S: StopStore,
    O: Optimizer,
    D: Directions,
{
    // Two distinct stops minimum: a depot alone, or a depot plus copies of
    // itself, is not a route.
    let distinct: HashSet<i64> = stop_ids.iter().copied().collect();
    if distinct.len() < 2 {
        return Err(RouteError::InvalidInput(String::from(
            "At least two distinct stops are required",
        )));
    }

    let resolved = store.get_by_ids(stop_ids);
    if resolved.len() != stop_ids.len() {
        return Err(RouteError::NotFound(String::from(
            "One or more stop IDs not found",
        )));
    }

    let depot = resolved[0].point();

    // Dense zero-based job ids in request order: job j is resolved[j + 1].
    // The optimizer echoes these ids back and reconcile() reverses the map.
    let jobs: Vec<(usize, Point)> = resolved[1..]
        .iter()
        .enumerate()
        .map(|(index, stop)| (index, stop.point()))
        .collect();

    debug!(stops = resolved.len(), "planning route");

    let order = optimizer
        .sequence(depot, &jobs)
        .await
        .map_err(upstream_error)?;

    let stops = reconcile(&resolved, &order)?;

    let waypoints: Vec<Point> = stops.iter().map(Stop::point).collect();
    let geometry = directions
        .path(&waypoints)
        .await
        .map_err(upstream_error)?;

    Ok(PlannedRoute { stops, geometry })
}

fn upstream_error(error: OrsError) -> RouteError {
    if error.is_unavailable() {
        RouteError::UpstreamUnavailable(error)
    } else {
        RouteError::UpstreamContractViolation(error.to_string())
    }
}

/// Maps the optimizer's job order back to stops, depot first. The order
/// must be a permutation of `0..jobs`; anything else means the optimizer
/// dropped or duplicated a visit and the request must fail rather than
/// silently truncate.
fn reconcile(resolved: &[Stop], order: &[usize]) -> Result<Vec<Stop>, RouteError> {
    let job_count = resolved.len() - 1;
    if order.len() != job_count {
        return Err(RouteError::UpstreamContractViolation(format!(
            "optimizer returned {} job visits, expected {}",
            order.len(),
            job_count
        )));
    }

    let mut seen = vec![false; job_count];
    let mut stops = Vec::with_capacity(resolved.len());
    stops.push(resolved[0].clone());

    for &index in order {
        if index >= job_count || seen[index] {
            return Err(RouteError::UpstreamContractViolation(format!(
                "optimizer job index {index} is out of range or repeated"
            )));
        }
        seen[index] = true;
        stops.push(resolved[index + 1].clone());
    }

    Ok(stops)
}
