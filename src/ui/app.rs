use crate::config::UiConfig;
use crate::loader::{Invoker, PendingRequest};
use crate::output::DiagnosticChannel;
use crate::ui::loader::{LoaderIntent, LoaderLifecycleState, LoaderReducer};
use crate::ui::mvi::Reducer;
use std::collections::VecDeque;
use std::sync::Arc;

/// Arithmetic operation offered by the selector.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Add,
    Multiply,
}

impl Operation {
    /// Name passed to the module as the first argument.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Multiply => "multiply",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operation::Add => "Add (+)",
            Operation::Multiply => "Multiply (*)",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Operation::Add => Operation::Multiply,
            Operation::Multiply => Operation::Add,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Operation::Add),
            "multiply" => Some(Operation::Multiply),
            _ => None,
        }
    }
}

/// Focusable controls, in Tab order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Focus {
    Operation,
    OperandA,
    OperandB,
    Calculate,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Operation => Focus::OperandA,
            Focus::OperandA => Focus::OperandB,
            Focus::OperandB => Focus::Calculate,
            Focus::Calculate => Focus::Operation,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Operation => Focus::Calculate,
            Focus::OperandA => Focus::Operation,
            Focus::OperandB => Focus::OperandA,
            Focus::Calculate => Focus::OperandB,
        }
    }
}

/// Generic MVI dispatch: takes current state, runs reducer, stores result.
macro_rules! dispatch_mvi {
    ($self:expr, $field:ident, $reducer:ty, $intent:expr) => {
        $self.$field = <$reducer>::reduce(std::mem::take(&mut $self.$field), $intent);
    };
}

/// Calculator panel state.
pub struct App {
    should_quit: bool,
    focus: Focus,
    /// Activity indicator frame, advanced on ticks while work is pending.
    spinner_frame: usize,
    operation: Operation,
    operand_a: String,
    operand_b: String,
    /// Module loader lifecycle (MVI pattern).
    pub loader_lifecycle: LoaderLifecycleState,
    /// Invocation queue (resource, managed outside MVI).
    invoker: Option<Invoker>,
    /// Captured lines, newest first.
    results: VecDeque<String>,
    max_results: usize,
    in_flight: usize,
    channel: Arc<dyn DiagnosticChannel>,
}

impl App {
    pub fn new(config: &UiConfig, channel: Arc<dyn DiagnosticChannel>) -> Self {
        Self {
            should_quit: false,
            focus: Focus::Operation,
            spinner_frame: 0,
            operation: Operation::parse(&config.default_operation).unwrap_or(Operation::Add),
            operand_a: config.default_operand_a.clone(),
            operand_b: config.default_operand_b.clone(),
            loader_lifecycle: LoaderLifecycleState::default(),
            invoker: None,
            results: VecDeque::new(),
            max_results: config.max_results.max(1),
            in_flight: 0,
            channel,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn set_operation(&mut self, operation: Operation) {
        self.operation = operation;
    }

    pub fn toggle_operation(&mut self) {
        self.operation = self.operation.toggled();
    }

    pub fn operand_a(&self) -> &str {
        &self.operand_a
    }

    pub fn operand_b(&self) -> &str {
        &self.operand_b
    }

    /// Types `ch` into the focused operand. Only number-like characters are
    /// accepted; the module does the actual validation.
    pub fn on_char(&mut self, ch: char) {
        if !(ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.')) {
            return;
        }
        if let Some(field) = self.focused_operand() {
            field.push(ch);
        }
    }

    pub fn on_backspace(&mut self) {
        if let Some(field) = self.focused_operand() {
            field.pop();
        }
    }

    fn focused_operand(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::OperandA => Some(&mut self.operand_a),
            Focus::OperandB => Some(&mut self.operand_b),
            Focus::Operation | Focus::Calculate => None,
        }
    }

    pub fn on_tick(&mut self) {
        if self.is_busy() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// True while the module is loading or an invocation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.loader_lifecycle.is_loading() || self.in_flight > 0
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    /// Dispatch an intent to the loader lifecycle reducer.
    ///
    /// A transition into `Failed` is surfaced in the result pane.
    pub fn dispatch_loader(&mut self, intent: LoaderIntent) {
        let was_failed = self.loader_lifecycle.failure().is_some();
        dispatch_mvi!(self, loader_lifecycle, LoaderReducer, intent);
        if was_failed {
            return;
        }
        let line = self
            .loader_lifecycle
            .failure()
            .map(|message| format!("Error setting up VM: {message}"));
        if let Some(line) = line {
            self.push_result(line);
        }
    }

    /// Store the invocation queue for the attached module.
    pub fn attach_invoker(&mut self, invoker: Invoker) {
        self.invoker = Some(invoker);
    }

    /// True once the self-check passed and an invoker is attached.
    pub fn is_ready(&self) -> bool {
        self.loader_lifecycle.is_ready() && self.invoker.is_some()
    }

    /// Submits the current form as an invocation.
    ///
    /// No-op until the module is ready. The computed value arrives later as a
    /// captured output line.
    pub fn calculate(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        let Some(invoker) = &self.invoker else {
            return false;
        };
        let request = PendingRequest::new(
            self.operation.as_str(),
            self.operand_a.clone(),
            self.operand_b.clone(),
        );
        self.channel
            .log(&[&format!("Calling {}", request.describe())]);
        if invoker.submit(request) {
            self.in_flight += 1;
            true
        } else {
            tracing::error!("invocation queue closed");
            self.push_result("Error: module worker stopped".to_string());
            false
        }
    }

    /// A captured line arrived from the output interceptor.
    pub fn on_output(&mut self, line: String) {
        self.push_result(line);
    }

    pub fn on_invocation_finished(&mut self, request: &PendingRequest, error: Option<String>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Some(error) = error {
            tracing::error!(call = %request.describe(), %error, "error executing");
            self.push_result(format!("Error: {error}"));
        }
    }

    fn push_result(&mut self, line: String) {
        self.results.push_front(line);
        self.results.truncate(self.max_results);
    }

    /// Captured lines, newest first.
    pub fn results(&self) -> &VecDeque<String> {
        &self.results
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_ready() {
            "Calculate"
        } else if self.loader_lifecycle.failure().is_some() {
            "Module unavailable"
        } else {
            "Loading VM..."
        }
    }
}
