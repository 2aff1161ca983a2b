//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents come from key presses or from background tasks (module attach,
/// invocation results) and are fed to a reducer.
pub trait Intent: Send + 'static {}
