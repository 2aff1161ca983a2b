//! Intents for the module loader lifecycle.

use crate::ui::mvi::Intent;

/// Intents that can be dispatched to the loader lifecycle reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderIntent {
    /// No module handle exists yet; attaching has started (or is already in flight).
    Start,

    /// The module handle appeared.
    HandleAcquired,

    /// A handle from an earlier mount exists; skip straight to the self-check.
    AlreadyAttached,

    /// The no-argument self-check invocation resolved.
    InitSucceeded,

    /// Attaching or the self-check failed.
    Failed { message: String },
}

impl Intent for LoaderIntent {}
