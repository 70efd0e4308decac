#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use payswitch::application::tracker::PaymentTracker;
use payswitch::domain::transaction::Transaction;
use payswitch::infrastructure::in_memory::{
    InMemoryReporter, RecordingActuator, ScriptedTransactionSource,
};
use std::time::Duration;

/// A tracker wired to in-memory ports, with handles kept for inspection.
pub struct Harness {
    pub source: ScriptedTransactionSource,
    pub actuator: RecordingActuator,
    pub reporter: InMemoryReporter,
    pub tracker: PaymentTracker,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(10))
    }

    pub fn with_interval(interval: Duration) -> Self {
        let source = ScriptedTransactionSource::new();
        let actuator = RecordingActuator::new();
        let reporter = InMemoryReporter::new();
        let tracker = PaymentTracker::new(
            Box::new(source.clone()),
            Box::new(actuator.clone()),
            Box::new(reporter.clone()),
            interval,
        );
        Self {
            source,
            actuator,
            reporter,
            tracker,
        }
    }
}

pub fn payment(id: &str, status: &str, secs: i64) -> Transaction {
    Transaction::new(
        id,
        status,
        Some("CARD"),
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
    )
}

pub fn config_json(api_url: &str, extra: &str) -> String {
    format!(
        r#"{{ "apiToken": "test-token", "apiUrl": "{}", "pollIntervalMs": 50{} }}"#,
        api_url, extra
    )
}
