use fieldroute_ors::directions::OrsDirectionsClient;
use fieldroute_ors::optimization::OrsOptimizationClient;
use fieldroute_store::store::JsonStopStore;

use crate::auth::AccessGate;

pub struct AppState {
    pub gate: AccessGate,
    pub store: JsonStopStore,
    pub optimizer: OrsOptimizationClient,
    pub directions: OrsDirectionsClient,
}
