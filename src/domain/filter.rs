// Filter control state machine
use serde::Serialize;

/// Stopped ⇄ Running. A toggle always flips; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterState {
    #[default]
    Stopped,
    Running,
}

impl FilterState {
    pub fn toggled(self) -> Self {
        match self {
            FilterState::Stopped => FilterState::Running,
            FilterState::Running => FilterState::Stopped,
        }
    }

    pub fn is_running(self) -> bool {
        self == FilterState::Running
    }

    /// Message announcing that the filter has just entered this state.
    pub fn notification(self) -> &'static str {
        match self {
            FilterState::Running => "Filter started",
            FilterState::Stopped => "Filter stopped",
        }
    }

    pub fn status_label(self) -> &'static str {
        match self {
            FilterState::Running => "Running",
            FilterState::Stopped => "Stopped",
        }
    }

    /// Label of the control that would toggle out of this state.
    pub fn control_label(self) -> &'static str {
        match self {
            FilterState::Running => "Stop Filter",
            FilterState::Stopped => "Start Filter",
        }
    }
}
