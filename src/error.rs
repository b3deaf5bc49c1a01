use crate::flight::{FlightId, OperationKind};
use crate::runway::RunwayId;
use std::path::PathBuf;
use thiserror::Error;

fn fmt_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every tower operation resolves into one of these at the orchestrator
/// boundary; the CLI maps them to exit code 1.
#[derive(Error, Debug)]
pub enum TowerError {
    #[error("arquivos obrigatórios ausentes: {}", fmt_paths(.0))]
    MissingReferenceFiles(Vec<PathBuf>),
    #[error("voo {0} não encontrado em planos_voo.csv")]
    UnknownFlight(FlightId),
    #[error("voo {0} já está em alguma fila")]
    DuplicateEntry(FlightId),
    #[error("Sem piloto válido (habilitação ou validade)")]
    PilotNotCertified,
    #[error("pista {0} inexistente")]
    UnknownRunway(RunwayId),
    #[error("pista {0} FECHADA")]
    RunwayClosed(RunwayId),
    #[error("NOTAM ativo fecha a pista {0} no horário atual")]
    NotamActive(RunwayId),
    #[error("capacidade reduzida por VIS < 6KM (uma operação por vez)")]
    CapacityDenied,
    #[error("fila de {0} vazia")]
    EmptyQueue(OperationKind),
    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),
    #[error("falha ao ler CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("registro inválido: {0}")]
    Json(#[from] serde_json::Error),
}

impl TowerError {
    /// Operational denials print as "Negado:", everything else as "Erro:".
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            TowerError::PilotNotCertified
                | TowerError::UnknownRunway(_)
                | TowerError::RunwayClosed(_)
                | TowerError::NotamActive(_)
                | TowerError::CapacityDenied
        )
    }
}
