use crate::error::TowerError;
use crate::time::Time;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type RunwayId = Arc<str>;

/// Baseline state from `pistas.txt`, authoritative before any NOTAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunwayCondition {
    Aberta,
    Fechada,
}

impl fmt::Display for RunwayCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunwayCondition::Aberta => write!(f, "ABERTA"),
            RunwayCondition::Fechada => write!(f, "FECHADA"),
        }
    }
}

pub type RunwayTable = HashMap<RunwayId, RunwayCondition>;

/// A NOTAM closure window, inclusive at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosureWindow {
    pub runway: RunwayId,
    pub from: Time,
    pub to: Time,
}

impl ClosureWindow {
    pub fn covers(&self, runway: &str, at: Time) -> bool {
        self.runway.as_ref() == runway && at.is_within(&(self.from, self.to))
    }
}

/// Admission gate for a clearance request. Checks short-circuit in order:
/// unknown runway, baseline closure, active NOTAM window. Weather is a rate
/// limit, not a gate, and is handled by the capacity throttle.
pub fn check_runway(
    runway: &RunwayId,
    table: &RunwayTable,
    closures: &[ClosureWindow],
    now: Time,
) -> Result<(), TowerError> {
    match table.get(runway) {
        None => Err(TowerError::UnknownRunway(runway.clone())),
        Some(RunwayCondition::Fechada) => Err(TowerError::RunwayClosed(runway.clone())),
        Some(RunwayCondition::Aberta) => {
            if closures.iter().any(|w| w.covers(runway, now)) {
                Err(TowerError::NotamActive(runway.clone()))
            } else {
                Ok(())
            }
        }
    }
}
