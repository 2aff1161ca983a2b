//! One-shot evaluation without the terminal UI.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::loader::{ModuleLoader, ModuleSlot, PendingRequest};
use crate::output::{DiagnosticChannel, OutputInterceptor};
use crate::vm::{ModuleSource, VmError};

/// Mounts the module, runs `request` once and returns every captured line
/// (self-check output first).
///
/// Lines captured before a failure are dropped along with the error.
pub async fn evaluate(
    interceptor: Arc<OutputInterceptor>,
    slot: Arc<ModuleSlot>,
    source: Arc<dyn ModuleSource>,
    attach_timeout: Duration,
    request: PendingRequest,
) -> Result<Vec<String>, VmError> {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);
    let subscription = interceptor.subscribe(move |line| sink.lock().push(line.to_string()));

    let channel: Arc<dyn DiagnosticChannel> = interceptor.clone();
    let loader = ModuleLoader::new(slot, source, Arc::clone(&channel), attach_timeout);

    let outcome = async {
        let module = loader
            .mount(|intent| tracing::debug!(?intent, "loader progress"))
            .await?;
        channel.log(&[&format!("Calling {}", request.describe())]);
        module.run(request.args()).await
    }
    .await;

    interceptor.unsubscribe(subscription);
    outcome?;
    let lines = std::mem::take(&mut *captured.lock());
    Ok(lines)
}
