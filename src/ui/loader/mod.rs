//! Module loader lifecycle feature module.
//!
//! Tracks whether the runtime module is attached and has passed its
//! self-check, gating invocations from the panel until it has.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - Lifecycle state enum (Unattached → Attaching → Initializing → Ready, or Failed)
//! - `intent.rs` - Loader events (Start, HandleAcquired, AlreadyAttached, InitSucceeded, Failed)
//! - `reducer.rs` - State transitions (pure, no side effects)
//!
//! The side effects live in [`crate::loader::ModuleLoader`], which reports
//! these intents as it makes progress.

mod intent;
mod reducer;
mod state;

pub use intent::LoaderIntent;
pub use reducer::LoaderReducer;
pub use state::LoaderLifecycleState;
