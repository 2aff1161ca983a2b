use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::vm::{VmError, VmModule};

/// One user request: operation name and two operands, passed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub operation: String,
    pub operand_a: String,
    pub operand_b: String,
}

impl PendingRequest {
    pub fn new(
        operation: impl Into<String>,
        operand_a: impl Into<String>,
        operand_b: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            operand_a: operand_a.into(),
            operand_b: operand_b.into(),
        }
    }

    /// `[operation, operand_a, operand_b]` as handed to `run`.
    pub fn args(&self) -> Vec<String> {
        vec![
            self.operation.clone(),
            self.operand_a.clone(),
            self.operand_b.clone(),
        ]
    }

    /// Rendering used when logging the call.
    pub fn describe(&self) -> String {
        format!(
            "run([\"{}\", \"{}\", \"{}\"])",
            self.operation, self.operand_a, self.operand_b
        )
    }
}

/// Serialized invocation queue for an attached module.
///
/// Requests run one at a time in submission order, so the output of one
/// invocation never interleaves with the next. Results still arrive through
/// the diagnostic channel; the completion callback only learns whether `run`
/// failed.
#[derive(Clone)]
pub struct Invoker {
    tx: mpsc::UnboundedSender<PendingRequest>,
}

impl Invoker {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// The worker stops once every `Invoker` clone is dropped.
    pub fn spawn<F>(module: Arc<dyn VmModule>, on_complete: F) -> (Self, JoinHandle<()>)
    where
        F: Fn(PendingRequest, Result<(), VmError>) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<PendingRequest>();
        let worker = tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                tracing::debug!(module = module.name(), call = %request.describe(), "invoking module");
                let result = module.run(request.args()).await;
                if let Err(err) = &result {
                    tracing::warn!(call = %request.describe(), error = %err, "invocation failed");
                }
                on_complete(request, result);
            }
            tracing::trace!("invoker queue closed");
        });
        (Self { tx }, worker)
    }

    /// Queues `request`. Returns false if the worker is gone.
    pub fn submit(&self, request: PendingRequest) -> bool {
        self.tx.send(request).is_ok()
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}
