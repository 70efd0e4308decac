use crate::domain::action::{LineId, LineState};
use crate::domain::ports::{Actuator, Reporter, TransactionSource};
use crate::domain::report::PaymentReport;
use crate::domain::transaction::Transaction;
use crate::error::{HardwareError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};

/// A transaction source that replays a fixed sequence of poll results.
///
/// Each `fetch` pops the next scripted result; once the script runs out every
/// poll returns an empty list. Clones share the same script.
#[derive(Default, Clone)]
pub struct ScriptedTransactionSource {
    polls: Arc<Mutex<VecDeque<Result<Vec<Transaction>>>>>,
}

impl ScriptedTransactionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, poll: Result<Vec<Transaction>>) {
        self.polls.lock().await.push_back(poll);
    }

    pub async fn remaining(&self) -> usize {
        self.polls.lock().await.len()
    }
}

#[async_trait]
impl TransactionSource for ScriptedTransactionSource {
    async fn fetch(&self) -> Result<Vec<Transaction>> {
        self.polls.lock().await.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// An actuator that records every line write.
///
/// Uses `Arc<RwLock<Vec<_>>>` so tests can keep a handle while the tracker owns
/// a boxed clone.
#[derive(Default, Clone)]
pub struct RecordingActuator {
    writes: Arc<RwLock<Vec<(LineId, LineState)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with `HardwareError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn writes(&self) -> Vec<(LineId, LineState)> {
        self.writes.read().await.clone()
    }
}

#[async_trait]
impl Actuator for RecordingActuator {
    async fn set_line(
        &self,
        line: LineId,
        state: LineState,
    ) -> std::result::Result<(), HardwareError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::Unavailable(line));
        }
        self.writes.write().await.push((line, state));
        Ok(())
    }
}

/// Keeps every report in memory.
#[derive(Default, Clone)]
pub struct InMemoryReporter {
    reports: Arc<RwLock<Vec<PaymentReport>>>,
}

impl InMemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reports(&self) -> Vec<PaymentReport> {
        self.reports.read().await.clone()
    }
}

#[async_trait]
impl Reporter for InMemoryReporter {
    async fn report(&self, report: &PaymentReport) -> Result<()> {
        self.reports.write().await.push(report.clone());
        Ok(())
    }
}
