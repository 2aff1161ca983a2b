use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crate::loader::{Invoker, PendingRequest};
use crate::ui::loader::LoaderIntent;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    /// Marker line captured from the diagnostic channel.
    Output(String),
    /// Progress of the module mount sequence.
    Loader(LoaderIntent),
    /// Mount finished; invocations go through this queue.
    ModuleAttached(Invoker),
    /// An invocation completed (`error` set if `run` rejected).
    InvocationFinished {
        request: PendingRequest,
        error: Option<String>,
    },
}

pub struct EventHandler {
    rx: Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    /// Starts the input thread. Fails if the thread cannot be spawned.
    pub fn new(tick_rate: Duration) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();

        thread::Builder::new()
            .name("input".to_string())
            .spawn(move || {
                let mut last_tick = Instant::now();
                loop {
                    let timeout = tick_rate
                        .saturating_sub(last_tick.elapsed())
                        .min(Duration::from_millis(50));

                    match event::poll(timeout) {
                        Ok(true) => {
                            let sent = match event::read() {
                                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                                    event_tx.send(AppEvent::Key(key))
                                }
                                Ok(Event::Resize(_, _)) => event_tx.send(AppEvent::Tick),
                                Ok(_) => Ok(()),
                                Err(err) => {
                                    tracing::error!(error = %err, "terminal read failed");
                                    break;
                                }
                            };
                            if sent.is_err() {
                                break;
                            }
                        }
                        Ok(false) => {}
                        Err(err) => {
                            tracing::error!(error = %err, "terminal poll failed");
                            break;
                        }
                    }

                    if last_tick.elapsed() >= tick_rate {
                        if event_tx.send(AppEvent::Tick).is_err() {
                            break;
                        }
                        last_tick = Instant::now();
                    }
                }
            })?;

        Ok(Self { rx, tx })
    }

    pub fn next(&self, timeout: Duration) -> Result<AppEvent, mpsc::RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }
}
