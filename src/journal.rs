use crate::error::TowerError;
use crate::flight::{FlightId, OperationKind};
use crate::runway::RunwayId;
use crate::store::{self, DataDir};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearanceOutcome {
    Autorizado,
    Negado,
}

/// One journaled clearance decision. `flight` is absent on denials that
/// happen before a queue entry is popped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearanceRecord {
    pub kind: OperationKind,
    pub flight: Option<FlightId>,
    pub runway: RunwayId,
    pub timestamp: NaiveDateTime,
    pub outcome: ClearanceOutcome,
}

/// Append-only decision journal; records are never rewritten or deleted.
/// The capacity throttle reads it back for its lookback.
#[derive(Debug, Clone)]
pub struct ClearanceLog {
    path: PathBuf,
}

impl ClearanceLog {
    pub fn new(dir: &DataDir) -> ClearanceLog {
        ClearanceLog { path: dir.clearance_log() }
    }

    pub fn append(&self, record: &ClearanceRecord) -> Result<(), TowerError> {
        let line = serde_json::to_string(record)?;
        store::append_line(&self.path, &line)?;
        Ok(())
    }

    /// Unreadable lines are skipped; a corrupt journal entry must not block
    /// the throttle lookback.
    pub fn records(&self) -> Result<Vec<ClearanceRecord>, TowerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(data
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect())
    }
}
