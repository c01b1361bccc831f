use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::stop::Stop;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read stop data: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stop data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only lookup of stops by id and by assignee.
///
/// Lookups are normal outcomes either way: a missing id is simply absent
/// from the result, never an error.
pub trait StopStore {
    /// Resolves the given ids in request order. Unknown ids are skipped, so
    /// the result may be shorter than the input; duplicated ids resolve
    /// once per occurrence.
    fn get_by_ids(&self, ids: &[i64]) -> Vec<Stop>;

    /// Stops assigned to the given user.
    fn assigned_to(&self, user_id: i64) -> Vec<Stop>;
}

#[derive(Deserialize)]
struct Assignment {
    user_id: i64,
    stop_ids: Vec<i64>,
}

#[derive(Deserialize)]
struct StoreFile {
    stops: Vec<Stop>,
    #[serde(default)]
    assignments: Vec<Assignment>,
}

/// In-memory store backed by the JSON file the import tool writes.
/// Loaded once at startup; lookups never touch the filesystem again.
pub struct JsonStopStore {
    stops: HashMap<i64, Stop>,
    assignments: HashMap<i64, Vec<i64>>,
}

impl JsonStopStore {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = File::open(path.as_ref())?;
        let parsed: StoreFile = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::from_parsed(parsed))
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let parsed: StoreFile = serde_json::from_str(json)?;
        Ok(Self::from_parsed(parsed))
    }

    fn from_parsed(parsed: StoreFile) -> Self {
        let stops: HashMap<i64, Stop> = parsed
            .stops
            .into_iter()
            .map(|stop| (stop.id, stop))
            .collect();

        let assignments = parsed
            .assignments
            .into_iter()
            .map(|assignment| (assignment.user_id, assignment.stop_ids))
            .collect();

        debug!(stops = stops.len(), "loaded stop store");

        Self { stops, assignments }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

impl StopStore for JsonStopStore {
    fn get_by_ids(&self, ids: &[i64]) -> Vec<Stop> {
        ids.iter()
            .filter_map(|id| self.stops.get(id).cloned())
            .collect()
    }

    fn assigned_to(&self, user_id: i64) -> Vec<Stop> {
        self.assignments
            .get(&user_id)
            .map(|stop_ids| self.get_by_ids(stop_ids))
            .unwrap_or_default()
    }
}
