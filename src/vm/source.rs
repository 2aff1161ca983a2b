use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::{CommandModule, MathModule, VmError, VmModule};
use crate::config::{ModuleSourceKind, VmConfig};
use crate::output::DiagnosticChannel;

/// Where a runtime module comes from.
///
/// `attach` is the only step that may suspend before a handle exists; the
/// loader calls it at most once per process unless it fails.
#[async_trait]
pub trait ModuleSource: Send + Sync {
    /// Identifier of the underlying resource, for logs and errors.
    fn resource(&self) -> String;

    async fn attach(
        &self,
        channel: Arc<dyn DiagnosticChannel>,
    ) -> Result<Arc<dyn VmModule>, VmError>;
}

/// Attaches the in-process [`MathModule`].
#[derive(Debug, Clone, Default)]
pub struct BuiltinSource {
    load_delay: Duration,
}

impl BuiltinSource {
    pub fn new(load_delay: Duration) -> Self {
        Self { load_delay }
    }
}

#[async_trait]
impl ModuleSource for BuiltinSource {
    fn resource(&self) -> String {
        "builtin:math".to_string()
    }

    async fn attach(
        &self,
        channel: Arc<dyn DiagnosticChannel>,
    ) -> Result<Arc<dyn VmModule>, VmError> {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        Ok(Arc::new(MathModule::new(channel)))
    }
}

/// Attaches a [`CommandModule`] after resolving its program.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn resolve(&self) -> Option<PathBuf> {
        let candidate = Path::new(&self.program);
        if candidate.components().count() > 1 || candidate.is_absolute() {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }
        let paths = std::env::var_os("PATH")?;
        std::env::split_paths(&paths)
            .map(|dir| dir.join(&self.program))
            .find(|path| path.is_file())
    }
}

#[async_trait]
impl ModuleSource for CommandSource {
    fn resource(&self) -> String {
        self.program.clone()
    }

    async fn attach(
        &self,
        channel: Arc<dyn DiagnosticChannel>,
    ) -> Result<Arc<dyn VmModule>, VmError> {
        let program = self.resolve().ok_or_else(|| VmError::ResourceLoad {
            resource: self.program.clone(),
            reason: "executable not found".to_string(),
        })?;
        tracing::debug!(program = %program.display(), "command module resolved");
        Ok(Arc::new(CommandModule::new(
            program,
            self.args.clone(),
            channel,
        )))
    }
}

/// Builds the source described by the `[vm]` config section.
///
/// Assumes the config passed validation, so a command source has a program.
pub fn source_from_config(config: &VmConfig) -> Arc<dyn ModuleSource> {
    match config.source {
        ModuleSourceKind::Builtin => Arc::new(BuiltinSource::new(Duration::from_millis(
            config.load_delay_ms,
        ))),
        ModuleSourceKind::Command => {
            let mut parts = config.command.iter().cloned();
            let program = parts.next().unwrap_or_default();
            Arc::new(CommandSource::new(program, parts.collect()))
        }
    }
}
