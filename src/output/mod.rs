//! Diagnostic output capture.
//!
//! The runtime module only knows how to write lines to the ambient diagnostic
//! channel. This module wraps that channel once, keeps every line flowing to
//! the original sink, and fans out marker lines to subscribers.
//!
//! ```text
//! module ──log──→ OutputInterceptor ──→ original sink
//!                        │
//!                        └─ marker match ──→ subscribers (in order)
//! ```

mod channel;
mod interceptor;
mod markers;
mod subscribers;

pub use channel::{DiagnosticChannel, TracingChannel, WriterChannel};
pub use interceptor::{install, installed, OutputInterceptor};
pub use markers::{MarkerSet, RESULT_MARKER, STARTUP_CHECK_MARKER};
pub use subscribers::{LineCallback, SubscriberSet, SubscriptionId};
