use crate::error::TowerError;
use crate::flight::OperationKind;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const FLIGHT_PLANS: &str = "planos_voo.csv";
pub const PILOTS: &str = "pilotos.csv";
pub const RUNWAYS: &str = "pistas.txt";
pub const METAR: &str = "metar.txt";
pub const NOTAM: &str = "notam.txt";
pub const FLEET: &str = "frota.csv";

/// Layout of the tower's base directory: `dados/` holds reference files and
/// the two queue files, `logs/` the clearance journal, `relatorios/` the
/// shift reports. All handles are explicit; nothing global.
#[derive(Debug, Clone)]
pub struct DataDir {
    base: PathBuf,
}

impl DataDir {
    pub fn new(base: impl Into<PathBuf>) -> DataDir {
        DataDir { base: base.into() }
    }

    pub fn data(&self, name: &str) -> PathBuf {
        self.base.join("dados").join(name)
    }

    pub fn queue_file(&self, kind: OperationKind) -> PathBuf {
        match kind {
            OperationKind::Decolagem => self.data("fila_decolagem.txt"),
            OperationKind::Pouso => self.data("fila_pouso.txt"),
        }
    }

    pub fn clearance_log(&self) -> PathBuf {
        self.base.join("logs").join("autorizacoes.jsonl")
    }

    pub fn report_file(&self, name: &str) -> PathBuf {
        self.base.join("relatorios").join(name)
    }

    /// All six reference files must exist before any decision logic runs.
    pub fn check_required(&self) -> Result<(), TowerError> {
        let missing: Vec<PathBuf> = [FLIGHT_PLANS, RUNWAYS, METAR, NOTAM, FLEET, PILOTS]
            .iter()
            .map(|name| self.data(name))
            .filter(|path| !path.exists())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TowerError::MissingReferenceFiles(missing))
        }
    }
}

/// Full-file replace through a temp sibling and rename, so a reader never
/// observes a partially written sequence.
pub fn atomic_replace(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

pub fn append_line(path: &Path, line: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}
