//! Shared test utilities and fake modules.

#![allow(dead_code, unused_imports)]

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vmcalc::config::UiConfig;
use vmcalc::output::{DiagnosticChannel, MarkerSet, OutputInterceptor};
use vmcalc::ui::app::App;
use vmcalc::vm::{ModuleSource, VmError, VmModule};

// -- Channels -----------------------------------------------------------------

/// Channel recording every call's arguments.
#[derive(Default)]
pub struct SpyChannel {
    calls: Mutex<Vec<Vec<String>>>,
}

impl SpyChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    /// Calls joined the way the interceptor joins them.
    pub fn lines(&self) -> Vec<String> {
        self.calls.lock().iter().map(|args| args.join(" ")).collect()
    }
}

impl DiagnosticChannel for SpyChannel {
    fn log(&self, args: &[&str]) {
        self.calls
            .lock()
            .push(args.iter().map(|arg| arg.to_string()).collect());
    }
}

/// Interceptor wrapping a fresh spy, with the default markers.
pub fn spy_interceptor() -> (Arc<SpyChannel>, Arc<OutputInterceptor>) {
    let spy = SpyChannel::new();
    let interceptor = OutputInterceptor::wrap(spy.clone(), MarkerSet::default());
    (spy, interceptor)
}

pub type Received = Arc<Mutex<Vec<String>>>;

/// Callback appending every delivered line to the returned buffer.
pub fn recorder() -> (Received, impl Fn(&str) + Send + Sync + 'static) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    (received, move |line: &str| sink.lock().push(line.to_string()))
}

// -- Scripted module ----------------------------------------------------------

/// Module that records its calls.
///
/// The self-check writes `Startup Check: ok` (or rejects with
/// `self_check_error`). Three-argument calls write `RESULT: <args>`; an
/// operation named `slow` sleeps first.
pub struct ScriptedModule {
    channel: Arc<dyn DiagnosticChannel>,
    calls: Mutex<Vec<Vec<String>>>,
    self_check_error: Option<String>,
    call_error: Option<String>,
}

impl ScriptedModule {
    pub fn new(channel: Arc<dyn DiagnosticChannel>) -> Self {
        Self {
            channel,
            calls: Mutex::new(Vec::new()),
            self_check_error: None,
            call_error: None,
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl VmModule for ScriptedModule {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn run(&self, args: Vec<String>) -> Result<(), VmError> {
        self.calls.lock().push(args.clone());
        if args.is_empty() {
            if let Some(message) = &self.self_check_error {
                return Err(VmError::Invocation(message.clone()));
            }
            self.channel.log(&["Startup Check:", "ok"]);
            return Ok(());
        }
        if let Some(message) = &self.call_error {
            return Err(VmError::Invocation(message.clone()));
        }
        if args.first().map(String::as_str) == Some("slow") {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.channel.log(&[&format!("RESULT: {}", args.join(" "))]);
        Ok(())
    }
}

/// Source attaching a [`ScriptedModule`], counting attaches.
#[derive(Default)]
pub struct ScriptedSource {
    pub attaches: AtomicUsize,
    pub attach_error: Option<VmError>,
    pub attach_delay: Duration,
    pub self_check_error: Option<String>,
    pub call_error: Option<String>,
    pub attached: Mutex<Option<Arc<ScriptedModule>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_count(&self) -> usize {
        self.attaches.load(Ordering::SeqCst)
    }

    /// The module created by the last successful attach.
    pub fn module(&self) -> Option<Arc<ScriptedModule>> {
        self.attached.lock().clone()
    }
}

#[async_trait]
impl ModuleSource for ScriptedSource {
    fn resource(&self) -> String {
        "scripted".to_string()
    }

    async fn attach(
        &self,
        channel: Arc<dyn DiagnosticChannel>,
    ) -> Result<Arc<dyn VmModule>, VmError> {
        self.attaches.fetch_add(1, Ordering::SeqCst);
        if !self.attach_delay.is_zero() {
            tokio::time::sleep(self.attach_delay).await;
        }
        if let Some(err) = &self.attach_error {
            return Err(err.clone());
        }
        let mut module = ScriptedModule::new(channel);
        module.self_check_error = self.self_check_error.clone();
        module.call_error = self.call_error.clone();
        let module = Arc::new(module);
        *self.attached.lock() = Some(Arc::clone(&module));
        Ok(module)
    }
}

// -- App helpers --------------------------------------------------------------

pub fn make_app() -> (App, Arc<SpyChannel>) {
    let spy = SpyChannel::new();
    let app = App::new(&UiConfig::default(), spy.clone());
    (app, spy)
}

pub fn press_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl_key(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
