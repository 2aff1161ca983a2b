use crate::config::Config;
use crate::loader::{Invoker, ModuleLoader, ModuleSlot};
use crate::output::{
    self, DiagnosticChannel, MarkerSet, OutputInterceptor, SubscriptionId, TracingChannel,
};
use crate::ui::app::App;
use crate::ui::events::{AppEvent, EventHandler};
use crate::ui::input::handle_key;
use crate::ui::render::draw;
use crate::ui::terminal_guard::setup_terminal;
use crate::vm::{source_from_config, ModuleSource};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

pub fn run(config: Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("vmcalc-worker")
        .build()?;
    let _enter = runtime.enter();

    let interceptor = output::install(
        Arc::new(TracingChannel::new()),
        MarkerSet::with_extra(config.output.extra_markers.iter().cloned()),
    );
    let channel: Arc<dyn DiagnosticChannel> = interceptor.clone();

    let (mut terminal, guard) = setup_terminal()?;
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);
    let events = EventHandler::new(tick_rate)?;
    let mut app = App::new(&config.ui, Arc::clone(&channel));

    let tx = events.sender();
    let subscription = mount_view(
        &interceptor,
        ModuleSlot::global(),
        source_from_config(&config.vm),
        channel,
        Duration::from_millis(config.vm.attach_timeout_ms),
        move |event| {
            let _ = tx.send(event);
        },
    );

    loop {
        terminal.draw(|frame| draw(frame, &app))?;
        if app.should_quit() {
            break;
        }

        match events.next(tick_rate) {
            Ok(event) => apply_event(&mut app, event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    interceptor.unsubscribe(subscription);
    drop(guard);
    runtime.shutdown_timeout(Duration::from_millis(500));
    Ok(())
}

/// Routes one event to the matching `App` handler.
pub fn apply_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Tick => app.on_tick(),
        AppEvent::Output(line) => app.on_output(line),
        AppEvent::Loader(intent) => app.dispatch_loader(intent),
        AppEvent::ModuleAttached(invoker) => app.attach_invoker(invoker),
        AppEvent::InvocationFinished { request, error } => {
            app.on_invocation_finished(&request, error)
        }
    }
}

/// Subscribes the view to captured output and starts the mount sequence.
///
/// Every event for the view goes through `emit`. Must run inside a tokio
/// runtime context. The caller unsubscribes on teardown.
pub fn mount_view<E>(
    interceptor: &OutputInterceptor,
    slot: Arc<ModuleSlot>,
    source: Arc<dyn ModuleSource>,
    channel: Arc<dyn DiagnosticChannel>,
    attach_timeout: Duration,
    emit: E,
) -> SubscriptionId
where
    E: Fn(AppEvent) + Clone + Send + Sync + 'static,
{
    let output_emit = emit.clone();
    let subscription = interceptor.subscribe(move |line| {
        output_emit(AppEvent::Output(line.to_string()));
    });

    let loader = ModuleLoader::new(slot, source, channel, attach_timeout);

    tokio::spawn(async move {
        let report_emit = emit.clone();
        let mounted = loader
            .mount(move |intent| report_emit(AppEvent::Loader(intent)))
            .await;
        let Ok(module) = mounted else {
            return;
        };

        let done_emit = emit.clone();
        let (invoker, _worker) = Invoker::spawn(module, move |request, result| {
            done_emit(AppEvent::InvocationFinished {
                request,
                error: result.err().map(|err| err.to_string()),
            });
        });
        emit(AppEvent::ModuleAttached(invoker));
    });

    subscription
}
