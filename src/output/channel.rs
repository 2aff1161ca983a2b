use parking_lot::Mutex;
use std::io::{self, Write};

/// The ambient text channel a runtime module writes its diagnostics to.
///
/// One `log` call carries one or more arguments; consumers that need a single
/// line join them with a space.
pub trait DiagnosticChannel: Send + Sync {
    fn log(&self, args: &[&str]);
}

/// Channel that turns every call into a `tracing` event under target `vm`.
///
/// Used by the panel, where stdout belongs to the terminal UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingChannel;

impl TracingChannel {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticChannel for TracingChannel {
    fn log(&self, args: &[&str]) {
        tracing::info!(target: "vm", "{}", args.join(" "));
    }
}

/// Channel that writes one line per call to an `io::Write`.
pub struct WriterChannel {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl WriterChannel {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }
}

impl DiagnosticChannel for WriterChannel {
    fn log(&self, args: &[&str]) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "{}", args.join(" "));
        let _ = writer.flush();
    }
}
