use super::action::LineId;
use super::transaction::Transaction;

/// A change in which payment is the most recent one.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Transition {
    pub old: Option<Transaction>,
    pub new: Transaction,
}

impl Transition {
    /// True when there was no payment on record before this one.
    pub fn is_initial(&self) -> bool {
        self.old.is_none()
    }
}

/// State carried from one poll to the next.
///
/// Owned by the driver loop; `previous` changes only through [`TrackerState::advance`].
#[derive(Debug, Default, Clone)]
pub struct TrackerState {
    previous: Option<Transaction>,
    last_triggered_line: Option<LineId>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&Transaction> {
        self.previous.as_ref()
    }

    pub fn last_triggered_line(&self) -> Option<LineId> {
        self.last_triggered_line
    }

    pub fn record_trigger(&mut self, line: LineId) {
        self.last_triggered_line = Some(line);
    }

    pub fn clear_trigger(&mut self) {
        self.last_triggered_line = None;
    }

    /// The line that must be released before `line` is asserted.
    ///
    /// Only the opposite line counts; re-asserting the held line releases
    /// nothing.
    pub fn line_to_release(&self, line: LineId) -> Option<LineId> {
        self.last_triggered_line.filter(|held| *held != line)
    }

    /// Compares the latest polled payment against the stored one.
    ///
    /// Returns a transition and stores `current` only when its id differs from
    /// the previous id. An absent `current` leaves the state untouched.
    pub fn advance(&mut self, current: Option<Transaction>) -> Option<Transition> {
        let current = current?;
        if self.previous.as_ref().is_some_and(|prev| prev.id == current.id) {
            return None;
        }
        let old = self.previous.replace(current.clone());
        Some(Transition { old, new: current })
    }
}
