use crate::error::TowerError;
use crate::flight::{FlightPlan, OperationClass};
use crate::pilot::PilotCertification;
use crate::runway::{ClosureWindow, RunwayCondition, RunwayTable};
use crate::store::{self, DataDir};
use crate::time::Time;
use crate::weather::WeatherReading;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::sync::Arc;

/// Reference data provider. Every accessor reads its file fresh: filings
/// and weather change between invocations and must be observed. The core
/// only ever sees the typed values produced here.
#[derive(Debug, Clone)]
pub struct Sources {
    dir: DataDir,
}

#[derive(Debug, Deserialize)]
struct PlanRow {
    voo: String,
    origem: Option<String>,
    destino: Option<String>,
    etd: Option<String>,
    eta: Option<String>,
    aeronave: Option<String>,
    tipo: Option<String>,
    prioridade: Option<String>,
    pista_pref: Option<String>,
}

impl From<PlanRow> for FlightPlan {
    fn from(row: PlanRow) -> FlightPlan {
        FlightPlan {
            id: Arc::from(row.voo.as_str()),
            origin: Arc::from(row.origem.unwrap_or_default().as_str()),
            destination: Arc::from(row.destino.unwrap_or_default().as_str()),
            etd: parse_time_or_midnight(row.etd),
            eta: parse_time_or_midnight(row.eta),
            aircraft_type: Arc::from(row.aeronave.unwrap_or_default().as_str()),
            class: OperationClass::from_code(&row.tipo.unwrap_or_default()),
            priority: row.prioridade.and_then(|v| v.trim().parse().ok()).unwrap_or(0),
            preferred_runway: Arc::from(row.pista_pref.unwrap_or_default().as_str()),
        }
    }
}

fn parse_time_or_midnight(field: Option<String>) -> Time {
    field.and_then(|v| v.parse().ok()).unwrap_or(Time(0))
}

#[derive(Debug, Deserialize)]
struct PilotRow {
    matricula: String,
    nome: Option<String>,
    habilitacao: Option<String>,
    validade: Option<String>,
}

impl From<PilotRow> for PilotCertification {
    fn from(row: PilotRow) -> PilotCertification {
        PilotCertification {
            pilot_id: Arc::from(row.matricula.as_str()),
            name: Arc::from(row.nome.unwrap_or_default().as_str()),
            rating: Arc::from(row.habilitacao.unwrap_or_default().as_str()),
            // anything that does not parse as a date counts as expired
            valid_until: row
                .validade
                .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok()),
        }
    }
}

impl Sources {
    pub fn new(dir: DataDir) -> Sources {
        Sources { dir }
    }

    fn csv_reader(&self, name: &str) -> Result<csv::Reader<fs::File>, TowerError> {
        Ok(csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(self.dir.data(name))?)
    }

    pub fn flight_plans(&self) -> Result<Vec<FlightPlan>, TowerError> {
        let mut plans = Vec::new();
        for row in self.csv_reader(store::FLIGHT_PLANS)?.deserialize::<PlanRow>() {
            plans.push(row?.into());
        }
        Ok(plans)
    }

    pub fn find_flight(&self, id: &str) -> Result<Option<FlightPlan>, TowerError> {
        Ok(self.flight_plans()?.into_iter().find(|p| p.id.as_ref() == id))
    }

    /// Roster in file order; eligibility relies on that order for its
    /// tie-break.
    pub fn roster(&self) -> Result<Vec<PilotCertification>, TowerError> {
        let mut roster = Vec::new();
        for row in self.csv_reader(store::PILOTS)?.deserialize::<PilotRow>() {
            roster.push(row?.into());
        }
        Ok(roster)
    }

    /// `pistas.txt`, one `<pista>, <estado>` pair per line. Any state other
    /// than `ABERTA` is closed; lines without a comma are ignored.
    pub fn runway_table(&self) -> Result<RunwayTable, TowerError> {
        let data = fs::read_to_string(self.dir.data(store::RUNWAYS))?;
        Ok(data
            .lines()
            .filter_map(|line| line.trim().split_once(','))
            .map(|(id, status)| {
                let condition = if status.trim() == "ABERTA" {
                    RunwayCondition::Aberta
                } else {
                    RunwayCondition::Fechada
                };
                (Arc::from(id.trim()), condition)
            })
            .collect())
    }

    pub fn closure_windows(&self) -> Result<Vec<ClosureWindow>, TowerError> {
        let data = fs::read_to_string(self.dir.data(store::NOTAM))?;
        Ok(data.lines().filter_map(parse_notam_line).collect())
    }

    /// Last non-empty METAR line wins; a line without a readable `VIS`
    /// group yields `None` (unrestricted).
    pub fn latest_weather(&self) -> Result<Option<WeatherReading>, TowerError> {
        let data = fs::read_to_string(self.dir.data(store::METAR))?;
        Ok(data
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .and_then(WeatherReading::parse_metar))
    }
}

/// `PISTA <pista> FECHADA <HH:MM>-<HH:MM> <texto livre>`; lines in any
/// other shape are not closures and are skipped.
fn parse_notam_line(line: &str) -> Option<ClosureWindow> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "PISTA" {
        return None;
    }
    let runway = tokens.next()?;
    if tokens.next()? != "FECHADA" {
        return None;
    }
    let window = tokens.find(|t| t.contains('-') && t.contains(':'))?;
    let (from, to) = window.split_once('-')?;
    Some(ClosureWindow {
        runway: Arc::from(runway),
        from: from.parse().ok()?,
        to: to.parse().ok()?,
    })
}
