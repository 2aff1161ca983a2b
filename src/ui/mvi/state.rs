//! Base trait for UI state.

/// Marker trait for state driven by a reducer.
///
/// `Default` is the state on mount; `PartialEq` lets callers detect changes.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
