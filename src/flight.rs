use crate::time::Time;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tabled::Tabled;

pub type FlightId = Arc<str>;

/// Which of the two tower queues an operation goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Decolagem,
    Pouso,
}

impl OperationKind {
    pub const ALL: [OperationKind; 2] = [OperationKind::Decolagem, OperationKind::Pouso];
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Decolagem => write!(f, "decolagem"),
            OperationKind::Pouso => write!(f, "pouso"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationClass {
    Normal,
    Emergencia,
}

impl OperationClass {
    /// Anything that is not `EMERGENCIA` degrades to `Normal`.
    pub fn from_code(code: &str) -> OperationClass {
        if code.trim() == "EMERGENCIA" {
            OperationClass::Emergencia
        } else {
            OperationClass::Normal
        }
    }
}

impl fmt::Display for OperationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationClass::Normal => write!(f, "NORMAL"),
            OperationClass::Emergencia => write!(f, "EMERGENCIA"),
        }
    }
}

/// One row of `planos_voo.csv`. Reference data, immutable per invocation.
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct FlightPlan {
    #[tabled(rename = "voo")]
    pub id: FlightId,
    #[tabled(rename = "origem")]
    pub origin: Arc<str>,
    #[tabled(rename = "destino")]
    pub destination: Arc<str>,
    pub etd: Time,
    pub eta: Time,
    #[tabled(rename = "aeronave")]
    pub aircraft_type: Arc<str>,
    #[tabled(rename = "tipo")]
    pub class: OperationClass,
    #[tabled(rename = "prioridade")]
    pub priority: u32,
    #[tabled(rename = "pista_pref")]
    pub preferred_runway: Arc<str>,
}
