use crate::error::TowerError;
use crate::flight::OperationKind::{Decolagem, Pouso};
use crate::journal::{ClearanceLog, ClearanceOutcome};
use crate::store::{self, DataDir};
use crate::tower::tests::utils::{METAR_LOW, at, fixture, write_dados};
use crate::tower::tower::Authorization;
use std::fs;
use std::sync::Arc;

#[test]
fn test_head_is_cleared_on_open_runway() {
    let (tmp, tower) = fixture();
    tower.enqueue("LA123", Decolagem, at(8, 0, 0)).unwrap();

    match tower.authorize(Decolagem, "10/28", at(8, 5, 0)).unwrap() {
        Authorization::Cleared { entry, runway, kind } => {
            assert_eq!(entry.flight.as_ref(), "LA123");
            assert_eq!(entry.assigned_runway, Some(Arc::from("10/28")));
            assert_eq!(runway.as_ref(), "10/28");
            assert_eq!(kind, Decolagem);
        }
        Authorization::QueueEmpty { .. } => panic!("expected a cleared flight"),
    }
    assert!(tower.queues().snapshot(Decolagem).unwrap().is_empty());

    let journal = ClearanceLog::new(&DataDir::new(tmp.path()));
    let records = journal.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, ClearanceOutcome::Autorizado);
    assert_eq!(records[0].flight, Some(Arc::from("LA123")));
}

#[test]
fn test_closed_runway_denies_and_preserves_queue() {
    let (_tmp, tower) = fixture();
    tower.enqueue("LA123", Decolagem, at(8, 0, 0)).unwrap();

    let result = tower.authorize(Decolagem, "01/19", at(8, 5, 0));
    assert!(matches!(result, Err(TowerError::RunwayClosed(_))));

    let queue = tower.queues().snapshot(Decolagem).unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].flight.as_ref(), "LA123");
}

#[test]
fn test_unknown_runway_wins_over_weather_and_notam() {
    let (tmp, tower) = fixture();
    write_dados(tmp.path(), store::METAR, METAR_LOW);
    write_dados(tmp.path(), store::NOTAM, "PISTA 07/25 FECHADA 00:00-23:59 OBRAS\n");

    let result = tower.authorize(Pouso, "07/25", at(8, 5, 0));
    assert!(matches!(result, Err(TowerError::UnknownRunway(_))));
}

#[test]
fn test_notam_window_denies_inclusive_bounds() {
    let (tmp, tower) = fixture();
    write_dados(tmp.path(), store::NOTAM, "PISTA 10/28 FECHADA 10:00-11:00 MANUTENCAO\n");

    let denied = |h: u32, m: u32| {
        matches!(
            tower.authorize(Decolagem, "10/28", at(h, m, 0)),
            Err(TowerError::NotamActive(_))
        )
    };
    assert!(!denied(9, 59));
    assert!(denied(10, 0));
    assert!(denied(10, 30));
    assert!(denied(11, 0));
    assert!(!denied(11, 1));
}

#[test]
fn test_empty_queue_is_a_noop_success() {
    let (_tmp, tower) = fixture();
    match tower.authorize(Decolagem, "10/28", at(8, 5, 0)).unwrap() {
        Authorization::QueueEmpty { kind } => assert_eq!(kind, Decolagem),
        Authorization::Cleared { .. } => panic!("queue should be empty"),
    }
    assert!(tower.queues().snapshot(Decolagem).unwrap().is_empty());
}

#[test]
fn test_low_visibility_allows_one_clearance_per_minute() {
    let (tmp, tower) = fixture();
    write_dados(tmp.path(), store::METAR, METAR_LOW);
    tower.enqueue("LA123", Decolagem, at(8, 0, 0)).unwrap();
    tower.enqueue("GL456", Decolagem, at(8, 0, 30)).unwrap();

    assert!(matches!(
        tower.authorize(Decolagem, "10/28", at(10, 0, 10)).unwrap(),
        Authorization::Cleared { .. }
    ));

    // same wall-clock minute: denied, queue untouched
    let second = tower.authorize(Decolagem, "10/28", at(10, 0, 40));
    assert!(matches!(second, Err(TowerError::CapacityDenied)));
    let queue = tower.queues().snapshot(Decolagem).unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].flight.as_ref(), "GL456");

    // next minute bucket: allowed again
    match tower.authorize(Decolagem, "10/28", at(10, 1, 5)).unwrap() {
        Authorization::Cleared { entry, .. } => assert_eq!(entry.flight.as_ref(), "GL456"),
        Authorization::QueueEmpty { .. } => panic!("GL456 should still be queued"),
    }
}

#[test]
fn test_denied_authorize_never_reorders() {
    let (_tmp, tower) = fixture();
    tower.enqueue("LA123", Decolagem, at(8, 0, 0)).unwrap();
    tower.enqueue("GL456", Decolagem, at(8, 1, 0)).unwrap();

    tower.authorize(Decolagem, "01/19", at(8, 5, 0)).unwrap_err();

    let queue = tower.queues().snapshot(Decolagem).unwrap();
    let ids: Vec<&str> = queue.iter().map(|e| e.flight.as_ref()).collect();
    assert_eq!(ids, vec!["LA123", "GL456"]);

    match tower.authorize(Decolagem, "10/28", at(8, 6, 0)).unwrap() {
        Authorization::Cleared { entry, .. } => assert_eq!(entry.flight.as_ref(), "LA123"),
        Authorization::QueueEmpty { .. } => panic!("queue should not be empty"),
    }
}

#[test]
fn test_denials_are_journaled_but_do_not_throttle() {
    let (tmp, tower) = fixture();
    write_dados(tmp.path(), store::METAR, METAR_LOW);
    tower.enqueue("LA123", Decolagem, at(8, 0, 0)).unwrap();

    tower.authorize(Decolagem, "01/19", at(10, 0, 0)).unwrap_err();

    // the denial shares the minute but must not consume capacity
    assert!(matches!(
        tower.authorize(Decolagem, "10/28", at(10, 0, 30)).unwrap(),
        Authorization::Cleared { .. }
    ));

    let journal = ClearanceLog::new(&DataDir::new(tmp.path()));
    let outcomes: Vec<ClearanceOutcome> =
        journal.records().unwrap().iter().map(|r| r.outcome).collect();
    assert_eq!(outcomes, vec![ClearanceOutcome::Negado, ClearanceOutcome::Autorizado]);
}

#[test]
fn test_queues_do_not_cross() {
    let (_tmp, tower) = fixture();
    tower.enqueue("LA123", Decolagem, at(8, 0, 0)).unwrap();
    tower.enqueue("GL456", Pouso, at(8, 0, 0)).unwrap();

    match tower.authorize(Pouso, "10/28", at(8, 5, 0)).unwrap() {
        Authorization::Cleared { entry, .. } => assert_eq!(entry.flight.as_ref(), "GL456"),
        Authorization::QueueEmpty { .. } => panic!("arrival queue should not be empty"),
    }
    assert_eq!(tower.queues().snapshot(Decolagem).unwrap().len(), 1);
}

#[test]
fn test_missing_reference_file_blocks_authorization() {
    let (tmp, tower) = fixture();
    fs::remove_file(tmp.path().join("dados").join(store::NOTAM)).unwrap();
    let result = tower.authorize(Decolagem, "10/28", at(8, 5, 0));
    assert!(matches!(result, Err(TowerError::MissingReferenceFiles(_))));
}

#[test]
fn test_report_counts_the_day() {
    let (tmp, tower) = fixture();
    tower.enqueue("LA123", Decolagem, at(8, 0, 0)).unwrap();
    tower.authorize(Decolagem, "10/28", at(8, 5, 0)).unwrap();
    tower.authorize(Decolagem, "01/19", at(8, 6, 0)).unwrap_err();

    let path = tower.write_report(at(18, 0, 0)).unwrap();
    assert!(path.starts_with(tmp.path().join("relatorios")));
    let text = fs::read_to_string(path).unwrap();
    assert!(text.contains("Autorizações concedidas hoje: 1"));
    assert!(text.contains("Autorizações negadas hoje: 1"));
}
