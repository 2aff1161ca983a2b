use std::sync::Arc;
use std::time::Duration;

use super::slot::{Claim, ModuleSlot};
use crate::output::DiagnosticChannel;
use crate::ui::loader::LoaderIntent;
use crate::vm::{ModuleSource, VmError, VmModule};

/// Per-view mount sequence for the runtime module.
///
/// Attaches through the shared [`ModuleSlot`] (at most one attach per
/// process), then runs the no-argument self-check. Progress is reported as
/// [`LoaderIntent`]s so the view can reduce its lifecycle state.
pub struct ModuleLoader {
    slot: Arc<ModuleSlot>,
    source: Arc<dyn ModuleSource>,
    channel: Arc<dyn DiagnosticChannel>,
    attach_timeout: Duration,
}

impl ModuleLoader {
    pub fn new(
        slot: Arc<ModuleSlot>,
        source: Arc<dyn ModuleSource>,
        channel: Arc<dyn DiagnosticChannel>,
        attach_timeout: Duration,
    ) -> Self {
        Self {
            slot,
            source,
            channel,
            attach_timeout,
        }
    }

    /// Runs the mount sequence, returning the handle once the self-check passed.
    ///
    /// Every error is reported as `LoaderIntent::Failed` before it is returned.
    pub async fn mount<F>(&self, mut report: F) -> Result<Arc<dyn VmModule>, VmError>
    where
        F: FnMut(LoaderIntent),
    {
        let handle = match self.acquire(&mut report).await {
            Ok(handle) => handle,
            Err(err) => {
                tracing::error!(resource = %self.source.resource(), error = %err, "module attach failed");
                report(LoaderIntent::Failed {
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        tracing::debug!(module = handle.name(), "running module self-check");
        match handle.run(Vec::new()).await {
            Ok(()) => {
                tracing::info!(module = handle.name(), "module ready");
                report(LoaderIntent::InitSucceeded);
                Ok(handle)
            }
            Err(err) => {
                tracing::error!(module = handle.name(), error = %err, "module self-check failed");
                report(LoaderIntent::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn acquire<F>(&self, report: &mut F) -> Result<Arc<dyn VmModule>, VmError>
    where
        F: FnMut(LoaderIntent),
    {
        match self.slot.claim() {
            Claim::Existing(handle) => {
                tracing::debug!("module already attached, skipping load");
                report(LoaderIntent::AlreadyAttached);
                Ok(handle)
            }
            Claim::Owner => {
                // Clears the marker on error and when this future is dropped mid-attach.
                let _release = ReleaseOnDrop(&self.slot);
                report(LoaderIntent::Start);
                tracing::info!(resource = %self.source.resource(), "attaching module");
                let handle = self
                    .with_timeout(self.source.attach(Arc::clone(&self.channel)))
                    .await?;
                self.slot.publish(Arc::clone(&handle));
                report(LoaderIntent::HandleAcquired);
                Ok(handle)
            }
            Claim::InFlight => {
                report(LoaderIntent::Start);
                tracing::debug!("module attach already in flight, waiting");
                let handle = self.with_timeout(self.slot.wait_attached()).await?;
                report(LoaderIntent::HandleAcquired);
                Ok(handle)
            }
        }
    }

    async fn with_timeout<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, VmError>>,
    ) -> Result<T, VmError> {
        match tokio::time::timeout(self.attach_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(VmError::AttachTimeout {
                timeout_ms: self.attach_timeout.as_millis() as u64,
            }),
        }
    }
}

/// Abandons an unpublished attach claim when dropped. No-op once published.
struct ReleaseOnDrop<'a>(&'a ModuleSlot);

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        if self.0.is_attaching() {
            tracing::debug!("attach did not complete, releasing slot");
        }
        self.0.abandon();
    }
}
