use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vm: VmConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the runtime module is loaded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleSourceKind {
    /// In-process arithmetic module.
    #[default]
    Builtin,
    /// External executable, see [`VmConfig::command`].
    Command,
}

/// Runtime module settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmConfig {
    #[serde(default)]
    pub source: ModuleSourceKind,
    /// Program followed by leading arguments (command source only).
    #[serde(default)]
    pub command: Vec<String>,
    /// How long to wait for the module to attach (default: 10000).
    #[serde(default = "default_attach_timeout_ms")]
    pub attach_timeout_ms: u64,
    /// Artificial load delay for the builtin module (default: 0).
    #[serde(default)]
    pub load_delay_ms: u64,
}

/// Panel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// "add" or "multiply" (default: "add").
    #[serde(default = "default_operation")]
    pub default_operation: String,
    #[serde(default = "default_operand_a")]
    pub default_operand_a: String,
    #[serde(default = "default_operand_b")]
    pub default_operand_b: String,
    /// Captured lines kept in the result pane (default: 200).
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

/// Output capture settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Markers captured in addition to the built-in ones.
    #[serde(default)]
    pub extra_markers: Vec<String>,
}

/// Log settings. `RUST_LOG` overrides `level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file used by the panel (default: cache dir).
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_attach_timeout_ms() -> u64 {
    10_000
}

fn default_operation() -> String {
    "add".to_string()
}

fn default_operand_a() -> String {
    "10".to_string()
}

fn default_operand_b() -> String {
    "20".to_string()
}

fn default_max_results() -> usize {
    200
}

fn default_tick_rate_ms() -> u64 {
    250
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            source: ModuleSourceKind::default(),
            command: Vec::new(),
            attach_timeout_ms: default_attach_timeout_ms(),
            load_delay_ms: 0,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_operation: default_operation(),
            default_operand_a: default_operand_a(),
            default_operand_b: default_operand_b(),
            max_results: default_max_results(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Configured log file, or `vmcalc/vmcalc.log` under the cache dir.
    pub fn file_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vmcalc")
                .join("vmcalc.log")
        })
    }
}
