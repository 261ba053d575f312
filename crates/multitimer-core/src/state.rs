use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state shared by timers and timer groups.
///
/// `Waiting` is only ever entered through a group's delayed start; a
/// standalone timer moves between `Stopped`, `Running`, `Warning` and
/// `Complete` on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerState {
    #[default]
    Stopped,
    Waiting,
    Running,
    Warning,
    Complete,
}

impl TimerState {
    /// Not actively counting down, so safe to reconfigure. `Waiting` counts:
    /// retuning a parked timer takes effect at its next start.
    pub fn is_quiescent(self) -> bool {
        matches!(
            self,
            TimerState::Stopped | TimerState::Waiting | TimerState::Complete
        )
    }

    /// Actively counting down; the warning phase still counts.
    pub fn is_running(self) -> bool {
        matches!(self, TimerState::Running | TimerState::Warning)
    }

    pub fn is_running_or_waiting(self) -> bool {
        self.is_running() || self == TimerState::Waiting
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerState::Stopped => "STOPPED",
            TimerState::Waiting => "WAITING",
            TimerState::Running => "RUNNING",
            TimerState::Warning => "WARNING",
            TimerState::Complete => "COMPLETE",
        };
        f.write_str(name)
    }
}
