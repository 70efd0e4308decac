mod common;

use common::{Harness, payment};
use payswitch::application::tracker::TickOutcome;
use payswitch::domain::action::{Action, LineId, LineState};

#[tokio::test]
async fn test_four_poll_scenario() {
    let mut h = Harness::new();
    h.source.push(Ok(vec![])).await;
    h.source.push(Ok(vec![payment("p1", "PENDING", 0)])).await;
    h.source
        .push(Ok(vec![payment("p1", "PENDING", 0), payment("p2", "COMPLETED", 60)]))
        .await;
    h.source
        .push(Ok(vec![payment("p2", "COMPLETED", 60), payment("p1", "PENDING", 0)]))
        .await;

    // Poll 1: nothing to see.
    assert_eq!(h.tracker.tick().await, TickOutcome::NoTransaction);
    assert!(h.reporter.reports().await.is_empty());
    assert!(h.tracker.state().previous().is_none());

    // Poll 2: first observation, no actuation.
    assert!(matches!(h.tracker.tick().await, TickOutcome::Observed(_)));
    let previous = h.tracker.state().previous().unwrap();
    assert_eq!(previous.id, "p1");
    assert_eq!(previous.raw_status, "PENDING");
    assert!(h.actuator.writes().await.is_empty());

    // Poll 3: p1 -> p2 actuates Line1 once.
    match h.tracker.tick().await {
        TickOutcome::Transitioned {
            transition,
            action,
            actuated,
        } => {
            assert_eq!(transition.old.unwrap().id, "p1");
            assert_eq!(transition.new.id, "p2");
            assert_eq!(action, Action::Actuate(LineId::Line1));
            assert!(actuated);
        }
        other => panic!("expected a transition, got {:?}", other),
    }
    assert_eq!(h.actuator.writes().await, vec![(LineId::Line1, LineState::High)]);
    let report = h.reporter.reports().await.last().cloned().unwrap();
    assert_eq!(report.old_payment_id, "p1");
    assert_eq!(report.new_payment_id, "p2");
    assert_eq!(report.new_payment_status, "COMPLETED");
    assert!(report.actuated);

    // Poll 4: unchanged.
    assert_eq!(h.tracker.tick().await, TickOutcome::Unchanged);
    assert_eq!(h.actuator.writes().await.len(), 1);
    assert_eq!(h.reporter.reports().await.len(), 2);
}

#[tokio::test]
async fn test_direct_transition_to_failed_resets_line12_only() {
    let mut h = Harness::new();
    h.source.push(Ok(vec![payment("PAYMENT0001", "COMPLETED", 0)])).await;
    h.source.push(Ok(vec![payment("PAYMENT0002", "FAILED", 5)])).await;

    h.tracker.tick().await;
    let outcome = h.tracker.tick().await;

    assert!(matches!(
        outcome,
        TickOutcome::Transitioned {
            action: Action::Reset(LineId::Line12),
            ..
        }
    ));
    let writes = h.actuator.writes().await;
    assert_eq!(writes, vec![(LineId::Line12, LineState::High)]);
    assert!(!writes.iter().any(|(line, _)| *line == LineId::Line1));

    let report = h.reporter.reports().await.last().cloned().unwrap();
    assert!(report.alarm);
    assert_eq!(report.old_payment_last4, "0001");
    assert_eq!(report.new_payment_last4, "0002");
}

#[tokio::test]
async fn test_constant_id_never_actuates_after_first_observation() {
    let mut h = Harness::new();
    for _ in 0..20 {
        h.source.push(Ok(vec![payment("same", "COMPLETED", 0)])).await;
    }

    let mut outcomes = Vec::new();
    for _ in 0..20 {
        outcomes.push(h.tracker.tick().await);
    }

    assert!(matches!(outcomes[0], TickOutcome::Observed(_)));
    assert!(outcomes[1..].iter().all(|o| *o == TickOutcome::Unchanged));
    assert!(h.actuator.writes().await.is_empty());
    assert_eq!(h.reporter.reports().await.len(), 1);
}

#[tokio::test]
async fn test_first_observation_of_failed_payment_does_nothing() {
    let mut h = Harness::new();
    h.source.push(Ok(vec![payment("p1", "FAILED", 0)])).await;

    assert!(matches!(h.tracker.tick().await, TickOutcome::Observed(_)));
    assert!(h.actuator.writes().await.is_empty());
    let report = h.reporter.reports().await.last().cloned().unwrap();
    assert_eq!(report.old_payment_id, "null");
    assert!(!report.actuated);
    assert!(!report.alarm);
}

#[tokio::test]
async fn test_unknown_status_transition_is_reported_without_actuation() {
    let mut h = Harness::new();
    h.source.push(Ok(vec![payment("p1", "COMPLETED", 0)])).await;
    h.source.push(Ok(vec![payment("p2", "SOMETHING_NEW", 1)])).await;

    h.tracker.tick().await;
    let outcome = h.tracker.tick().await;

    assert!(matches!(
        outcome,
        TickOutcome::Transitioned {
            action: Action::None,
            actuated: false,
            ..
        }
    ));
    assert!(h.actuator.writes().await.is_empty());
    assert_eq!(h.reporter.reports().await.len(), 2);
}

#[tokio::test]
async fn test_each_distinct_id_transitions_exactly_once() {
    let mut h = Harness::new();
    let ids = ["A", "A", "B", "B", "B", "C", "A", "A"];
    for (i, id) in ids.iter().enumerate() {
        h.source.push(Ok(vec![payment(id, "APPROVED", i as i64)])).await;
    }

    let mut transitions = Vec::new();
    for _ in 0..ids.len() {
        if let TickOutcome::Transitioned { transition, .. } = h.tracker.tick().await {
            transitions.push((transition.old.unwrap().id, transition.new.id));
        }
    }

    assert_eq!(
        transitions,
        vec![
            ("A".to_string(), "B".to_string()),
            ("B".to_string(), "C".to_string()),
            ("C".to_string(), "A".to_string()),
        ]
    );
    assert_eq!(h.actuator.writes().await.len(), 3);
    assert_eq!(h.tracker.state().last_triggered_line(), Some(LineId::Line1));
}
