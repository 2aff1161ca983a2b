use thiserror::Error;

/// Errors from attaching or invoking a runtime module.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VmError {
    /// The module resource could not be loaded.
    #[error("failed to load module resource '{resource}': {reason}")]
    ResourceLoad { resource: String, reason: String },

    /// The module never became available.
    #[error("module did not attach within {timeout_ms} ms")]
    AttachTimeout { timeout_ms: u64 },

    /// `run` rejected.
    #[error("{0}")]
    Invocation(String),
}

impl VmError {
    /// True for errors raised before a module handle existed.
    pub fn is_attach_error(&self) -> bool {
        matches!(self, VmError::ResourceLoad { .. } | VmError::AttachTimeout { .. })
    }
}
