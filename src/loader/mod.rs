//! Attaching the runtime module and invoking it.
//!
//! - `slot.rs` - process-wide module handle with the attach-once marker
//! - `service.rs` - per-view mount sequence (attach, self-check)
//! - `invoker.rs` - serialized invocation queue

mod invoker;
mod service;
mod slot;

pub use invoker::{Invoker, PendingRequest};
pub use service::ModuleLoader;
pub use slot::{Claim, ModuleSlot};
