//! State for the module loader lifecycle.

use crate::ui::mvi::UiState;

/// Module loader state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoaderLifecycleState {
    /// Mounted, nothing requested yet.
    #[default]
    Unattached,

    /// Waiting for the module resource to load.
    Attaching,

    /// Handle present, self-check invocation in flight.
    Initializing,

    /// Self-check passed; invocations allowed.
    Ready,

    /// Attach or self-check failed. Not retried automatically.
    Failed { message: String },
}

impl UiState for LoaderLifecycleState {}

impl LoaderLifecycleState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Unattached | Self::Attaching | Self::Initializing)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Short label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unattached => "Starting",
            Self::Attaching => "Loading module",
            Self::Initializing => "Initializing",
            Self::Ready => "Ready",
            Self::Failed { .. } => "Failed",
        }
    }
}
