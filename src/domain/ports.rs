use super::action::{LineId, LineState};
use super::report::PaymentReport;
use super::transaction::Transaction;
use crate::error::{HardwareError, Result};
use async_trait::async_trait;

/// Supplies the payments currently known to the ledger, in no particular order.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Transaction>>;
}

/// Drives the physical output lines.
///
/// Writes must be idempotent: setting a line to the state it already holds has
/// no observable effect.
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn set_line(
        &self,
        line: LineId,
        state: LineState,
    ) -> std::result::Result<(), HardwareError>;
}

/// Persists a summary of each detected transition.
#[async_trait]
pub trait Reporter: Send + Sync {
    async fn report(&self, report: &PaymentReport) -> Result<()>;
}

pub type TransactionSourceBox = Box<dyn TransactionSource>;
pub type ActuatorBox = Box<dyn Actuator>;
pub type ReporterBox = Box<dyn Reporter>;
