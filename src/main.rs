use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use vmcalc::config::Config;
use vmcalc::loader::{ModuleSlot, PendingRequest};
use vmcalc::output::{self, DiagnosticChannel, MarkerSet, TracingChannel, WriterChannel};
use vmcalc::vm::source_from_config;
use vmcalc::{headless, logging, ui};

#[derive(Debug, Parser)]
#[command(name = "vmcalc", version, about = "Calculator panel driving an embedded runtime module")]
struct Cli {
    /// Config file (default: <config dir>/vmcalc/config.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the module, run one operation and print the captured lines.
    Eval {
        /// Operation name passed to the module ("add" or "multiply").
        operation: String,
        a: String,
        b: String,
        /// Echo every module line to stderr instead of the log.
        #[arg(long)]
        echo: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        None => {
            let log_path = logging::init_file(&config.logging)?;
            tracing::info!(log = %log_path.display(), "starting panel");
            ui::run(config)
        }
        Some(Command::Eval {
            operation,
            a,
            b,
            echo,
        }) => {
            logging::init_stderr(&config.logging)?;
            let sink: Arc<dyn DiagnosticChannel> = if echo {
                Arc::new(WriterChannel::stderr())
            } else {
                Arc::new(TracingChannel::new())
            };
            run_eval(config, sink, PendingRequest::new(operation, a, b))
        }
    }
}

fn run_eval(
    config: Config,
    sink: Arc<dyn DiagnosticChannel>,
    request: PendingRequest,
) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let lines = runtime.block_on(async {
        let interceptor = output::install(
            sink,
            MarkerSet::with_extra(config.output.extra_markers.iter().cloned()),
        );
        headless::evaluate(
            interceptor,
            ModuleSlot::global(),
            source_from_config(&config.vm),
            Duration::from_millis(config.vm.attach_timeout_ms),
            request,
        )
        .await
    })?;

    for line in lines {
        println!("{line}");
    }
    Ok(())
}
