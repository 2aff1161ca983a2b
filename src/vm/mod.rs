//! Runtime modules the panel can drive.
//!
//! A module is attached once through a [`ModuleSource`] and then invoked with
//! string arguments. It reports results only by writing lines to the
//! diagnostic channel it was attached with; `run` resolving just means the
//! invocation did not fail.

mod builtin;
mod command;
mod error;
mod source;

use async_trait::async_trait;

pub use builtin::MathModule;
pub use command::CommandModule;
pub use error::VmError;
pub use source::{source_from_config, BuiltinSource, CommandSource, ModuleSource};

/// An attached runtime module.
#[async_trait]
pub trait VmModule: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Runs the module entry point with `args`.
    async fn run(&self, args: Vec<String>) -> Result<(), VmError>;
}
