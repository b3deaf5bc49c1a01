use crate::capacity;
use crate::error::TowerError;
use crate::flight::{FlightId, OperationKind};
use crate::journal::{ClearanceLog, ClearanceOutcome, ClearanceRecord};
use crate::pilot::{PilotCertification, qualified_pilot};
use crate::queue::{QueueEntry, QueueStore};
use crate::runway::{RunwayCondition, RunwayId, check_runway};
use crate::sources::Sources;
use crate::store::{self, DataDir};
use crate::time::Time;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Successful admission into a queue.
pub struct Enqueued {
    pub flight: FlightId,
    pub kind: OperationKind,
    pub pilot: PilotCertification,
}

/// Outcome of a clearance request that passed the gate and the throttle.
/// An empty queue is a reportable no-op, not an error.
#[derive(Debug)]
pub enum Authorization {
    Cleared {
        entry: QueueEntry,
        runway: RunwayId,
        kind: OperationKind,
    },
    QueueEmpty {
        kind: OperationKind,
    },
}

pub struct TowerStatus {
    pub runways: Vec<(RunwayId, RunwayCondition)>,
    pub departures: Vec<QueueEntry>,
    pub arrivals: Vec<QueueEntry>,
}

/// Orchestrates eligibility at admission time and gate + throttle at
/// clearance time. All state handles are injected; a denied request never
/// mutates the queues.
pub struct Tower {
    dir: DataDir,
    sources: Sources,
    queues: QueueStore,
    journal: ClearanceLog,
}

impl Tower {
    pub fn open(dir: DataDir) -> Tower {
        Tower {
            sources: Sources::new(dir.clone()),
            queues: QueueStore::new(dir.clone()),
            journal: ClearanceLog::new(&dir),
            dir,
        }
    }

    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    pub fn queues(&self) -> &QueueStore {
        &self.queues
    }

    /// Validates that every reference file is present.
    pub fn check_data(&self) -> Result<(), TowerError> {
        self.dir.check_required()
    }

    /// Admits a flight into the queue for `kind`: the plan must exist, the
    /// flight must not already sit in a queue, and a currently certified
    /// pilot must cover the aircraft type.
    pub fn enqueue(
        &self,
        flight_id: &str,
        kind: OperationKind,
        now: NaiveDateTime,
    ) -> Result<Enqueued, TowerError> {
        self.dir.check_required()?;

        let plan = self
            .sources
            .find_flight(flight_id)?
            .ok_or_else(|| TowerError::UnknownFlight(Arc::from(flight_id)))?;
        if self.queues.contains(flight_id)? {
            return Err(TowerError::DuplicateEntry(plan.id));
        }

        let roster = self.sources.roster()?;
        let pilot = qualified_pilot(&plan.aircraft_type, &roster, now.date())
            .ok_or(TowerError::PilotNotCertified)?
            .clone();

        self.queues.append(
            kind,
            QueueEntry {
                flight: plan.id.clone(),
                enqueued_at: now,
                priority: plan.priority,
                assigned_runway: None,
            },
        )?;
        info!(
            voo = %plan.id,
            operacao = %kind,
            piloto = %pilot.pilot_id,
            nome = %pilot.name,
            "voo enfileirado"
        );
        self.assert_invariants();
        Ok(Enqueued { flight: plan.id, kind, pilot })
    }

    /// Clears the head of the queue for `kind` on the given runway, if the
    /// gate admits it and the throttle has room. Denials leave the queue
    /// untouched; repeating the same request yields the same decision.
    pub fn authorize(
        &self,
        kind: OperationKind,
        runway_id: &str,
        now: NaiveDateTime,
    ) -> Result<Authorization, TowerError> {
        self.dir.check_required()?;
        let runway: RunwayId = Arc::from(runway_id);

        let table = self.sources.runway_table()?;
        let closures = self.sources.closure_windows()?;
        if let Err(denial) = check_runway(&runway, &table, &closures, Time::from(now.time())) {
            self.record(kind, None, &runway, now, ClearanceOutcome::Negado)?;
            warn!(operacao = %kind, pista = %runway, motivo = %denial, "autorização negada");
            return Err(denial);
        }

        let weather = self.sources.latest_weather()?;
        if !capacity::allows(weather, &self.journal.records()?, now) {
            self.record(kind, None, &runway, now, ClearanceOutcome::Negado)?;
            warn!(operacao = %kind, pista = %runway, "autorização negada por capacidade");
            return Err(TowerError::CapacityDenied);
        }

        let mut entry = match self.queues.pop_front(kind) {
            Ok(entry) => entry,
            Err(TowerError::EmptyQueue(_)) => {
                info!(operacao = %kind, pista = %runway, "fila vazia");
                return Ok(Authorization::QueueEmpty { kind });
            }
            Err(other) => return Err(other),
        };
        entry.assigned_runway = Some(runway.clone());
        self.record(kind, Some(entry.flight.clone()), &runway, now, ClearanceOutcome::Autorizado)?;
        info!(voo = %entry.flight, operacao = %kind, pista = %runway, "operação autorizada");
        self.assert_invariants();
        Ok(Authorization::Cleared { entry, runway, kind })
    }

    pub fn status(&self) -> Result<TowerStatus, TowerError> {
        self.dir.check_required()?;
        let mut runways: Vec<_> = self.sources.runway_table()?.into_iter().collect();
        runways.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(TowerStatus {
            runways,
            departures: self.queues.snapshot(OperationKind::Decolagem)?,
            arrivals: self.queues.snapshot(OperationKind::Pouso)?,
        })
    }

    /// Writes the shift summary under `relatorios/` and returns its path.
    pub fn write_report(&self, now: NaiveDateTime) -> Result<PathBuf, TowerError> {
        let status = self.status()?;
        let records = self.journal.records()?;
        let today = now.date();
        let granted = records
            .iter()
            .filter(|r| r.outcome == ClearanceOutcome::Autorizado && r.timestamp.date() == today)
            .count();
        let denied = records
            .iter()
            .filter(|r| r.outcome == ClearanceOutcome::Negado && r.timestamp.date() == today)
            .count();

        let mut text = String::new();
        text.push_str(&format!("Relatório do turno ({})\n", now.format("%Y-%m-%d")));
        text.push_str(&format!("- Fila de decolagem: {} itens\n", status.departures.len()));
        text.push_str(&format!("- Fila de pouso: {} itens\n", status.arrivals.len()));
        text.push_str(&format!("- Autorizações concedidas hoje: {granted}\n"));
        text.push_str(&format!("- Autorizações negadas hoje: {denied}\n"));

        let path = self.dir.report_file(&format!("operacao_{}.txt", now.format("%Y%m%d")));
        store::atomic_replace(&path, &text)?;
        Ok(path)
    }

    fn record(
        &self,
        kind: OperationKind,
        flight: Option<FlightId>,
        runway: &RunwayId,
        now: NaiveDateTime,
        outcome: ClearanceOutcome,
    ) -> Result<(), TowerError> {
        self.journal.append(&ClearanceRecord {
            kind,
            flight,
            runway: runway.clone(),
            timestamp: now,
            outcome,
        })
    }

    // duplicate-admission guard, active in debug builds only
    fn assert_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        if let (Ok(departures), Ok(arrivals)) = (
            self.queues.snapshot(OperationKind::Decolagem),
            self.queues.snapshot(OperationKind::Pouso),
        ) {
            let mut seen = HashSet::new();
            for entry in departures.iter().chain(arrivals.iter()) {
                debug_assert!(
                    seen.insert(entry.flight.clone()),
                    "voo presente em mais de uma fila: {}",
                    entry.flight
                );
            }
        }
    }
}
