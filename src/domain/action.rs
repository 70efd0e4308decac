use super::transaction::StatusCode;
use std::fmt;

/// The two digital outputs driven by the tracker.
///
/// `Line1` signals a progressing or successful payment, `Line12` a failed or
/// canceled one.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum LineId {
    Line1,
    Line12,
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineId::Line1 => write!(f, "Line1"),
            LineId::Line12 => write!(f, "Line12"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LineState {
    High,
    Low,
}

impl LineState {
    /// Value written to a sysfs `value` file.
    pub fn as_sysfs(&self) -> &'static str {
        match self {
            LineState::High => "1",
            LineState::Low => "0",
        }
    }
}

/// Hardware response to a classified transition.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Action {
    Actuate(LineId),
    Reset(LineId),
    None,
}

impl Action {
    /// The line write this action asks for, if any.
    ///
    /// Both classes assert their line. Lines are never released by the tracker.
    pub fn line_write(&self) -> Option<(LineId, LineState)> {
        match self {
            Action::Actuate(line) | Action::Reset(line) => Some((*line, LineState::High)),
            Action::None => None,
        }
    }

    /// Failed and canceled payments are reported with an alarm.
    pub fn is_alarm(&self) -> bool {
        matches!(self, Action::Reset(_))
    }
}

/// Maps a payment status to the action for its transition.
///
/// Nothing fires on the first payment ever observed, since that only reflects
/// whatever was already in the ledger at startup.
pub fn classify(status: StatusCode, has_previous: bool) -> Action {
    if !has_previous {
        return Action::None;
    }
    match status {
        StatusCode::Approved | StatusCode::Completed | StatusCode::Pending => {
            Action::Actuate(LineId::Line1)
        }
        StatusCode::Canceled | StatusCode::Failed => Action::Reset(LineId::Line12),
        StatusCode::Other => Action::None,
    }
}
