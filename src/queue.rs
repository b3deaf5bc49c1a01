use crate::error::TowerError;
use crate::flight::{FlightId, OperationKind};
use crate::runway::RunwayId;
use crate::store::{self, DataDir};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;

/// One queued operation. `assigned_runway` stays empty until the entry is
/// cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub flight: FlightId,
    pub enqueued_at: NaiveDateTime,
    pub priority: u32,
    pub assigned_runway: Option<RunwayId>,
}

/// The two tower queues, persisted as ordered JSON records, one per line.
/// Every call reloads from disk: the files are the authoritative shared
/// state between invocations. Entries append at the tail and leave strictly
/// from the head.
#[derive(Debug, Clone)]
pub struct QueueStore {
    dir: DataDir,
}

impl QueueStore {
    pub fn new(dir: DataDir) -> QueueStore {
        QueueStore { dir }
    }

    fn load(&self, kind: OperationKind) -> Result<Vec<QueueEntry>, TowerError> {
        let path = self.dir.queue_file(kind);
        if !path.exists() {
            return Ok(Vec::new());
        }
        // unlike the journal, a corrupt queue record is a hard error: the
        // FIFO identity of every entry matters
        fs::read_to_string(&path)?
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(TowerError::from))
            .collect()
    }

    fn persist(&self, kind: OperationKind, entries: &[QueueEntry]) -> Result<(), TowerError> {
        let mut contents = String::new();
        for entry in entries {
            contents.push_str(&serde_json::to_string(entry)?);
            contents.push('\n');
        }
        store::atomic_replace(&self.dir.queue_file(kind), &contents)?;
        Ok(())
    }

    /// True if the flight sits in either queue.
    pub fn contains(&self, flight: &str) -> Result<bool, TowerError> {
        for kind in OperationKind::ALL {
            if self.load(kind)?.iter().any(|e| e.flight.as_ref() == flight) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Appends at the tail, re-validating the no-duplicate-admission
    /// invariant even though the orchestrator checks it first.
    pub fn append(&self, kind: OperationKind, entry: QueueEntry) -> Result<(), TowerError> {
        if self.contains(&entry.flight)? {
            return Err(TowerError::DuplicateEntry(entry.flight));
        }
        let mut entries = self.load(kind)?;
        entries.push(entry);
        self.persist(kind, &entries)
    }

    pub fn peek_front(&self, kind: OperationKind) -> Result<Option<QueueEntry>, TowerError> {
        Ok(self.load(kind)?.into_iter().next())
    }

    /// Removes the head and rewrites the remainder as one atomic replace.
    pub fn pop_front(&self, kind: OperationKind) -> Result<QueueEntry, TowerError> {
        let mut entries = self.load(kind)?;
        if entries.is_empty() {
            return Err(TowerError::EmptyQueue(kind));
        }
        let head = entries.remove(0);
        self.persist(kind, &entries)?;
        Ok(head)
    }

    /// Read-only copy in stored (insertion) order.
    pub fn snapshot(&self, kind: OperationKind) -> Result<Vec<QueueEntry>, TowerError> {
        self.load(kind)
    }
}

/// Reordered view for listings: highest priority first, insertion order on
/// ties. The stored queue is untouched.
pub fn by_priority(entries: &[QueueEntry]) -> Vec<QueueEntry> {
    let mut view = entries.to_vec();
    view.sort_by_key(|e| std::cmp::Reverse(e.priority));
    view
}
