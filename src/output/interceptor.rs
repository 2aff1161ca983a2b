use std::sync::{Arc, OnceLock};

use super::channel::DiagnosticChannel;
use super::markers::MarkerSet;
use super::subscribers::{SubscriberSet, SubscriptionId};

static INSTALLED: OnceLock<Arc<OutputInterceptor>> = OnceLock::new();

/// Wraps a diagnostic channel, forwarding everything to it and fanning out
/// marker lines to subscribers.
///
/// Wrapping happens at construction, so an interceptor always has exactly one
/// original sink. Use [`install`] for the process-wide instance.
pub struct OutputInterceptor {
    original: Arc<dyn DiagnosticChannel>,
    markers: MarkerSet,
    subscribers: SubscriberSet,
}

impl OutputInterceptor {
    pub fn wrap(original: Arc<dyn DiagnosticChannel>, markers: MarkerSet) -> Arc<Self> {
        Arc::new(Self {
            original,
            markers,
            subscribers: SubscriberSet::new(),
        })
    }

    /// Registers `callback` for every future marker line.
    ///
    /// The callback runs synchronously on the thread that emitted the line.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(Arc::new(callback))
    }

    /// No-op if the subscription is unknown or already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if !self.subscribers.unsubscribe(id) {
            tracing::trace!(?id, "unsubscribe of unknown subscription ignored");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// The wrapped sink, for callers that want to bypass capture on teardown.
    pub fn original(&self) -> Arc<dyn DiagnosticChannel> {
        Arc::clone(&self.original)
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }
}

impl DiagnosticChannel for OutputInterceptor {
    fn log(&self, args: &[&str]) {
        self.original.log(args);
        let line = args.join(" ");
        if self.markers.matches(&line) {
            self.subscribers.deliver(&line);
        }
    }
}

/// Wraps `original` as the process-wide interceptor.
///
/// Only the first call wraps; later calls drop their arguments and return the
/// interceptor created by the first one.
pub fn install(original: Arc<dyn DiagnosticChannel>, markers: MarkerSet) -> Arc<OutputInterceptor> {
    let mut wrapped_now = false;
    let interceptor = INSTALLED.get_or_init(|| {
        wrapped_now = true;
        OutputInterceptor::wrap(original, markers)
    });
    if wrapped_now {
        tracing::debug!(
            markers = ?interceptor.markers().markers(),
            "diagnostic channel wrapped"
        );
    }
    Arc::clone(interceptor)
}

/// The process-wide interceptor, if [`install`] has run.
pub fn installed() -> Option<Arc<OutputInterceptor>> {
    INSTALLED.get().cloned()
}
