use async_trait::async_trait;
use std::sync::Arc;

use super::{VmError, VmModule};
use crate::output::{DiagnosticChannel, RESULT_MARKER, STARTUP_CHECK_MARKER};

const GREETING: &str = "Hello from the embedded VM! (Run with [op, a, b] to calculate)";
const CHECK_A: i32 = 10;
const CHECK_B: i32 = 20;

/// In-process arithmetic module.
///
/// With `[op, a, b]` it writes `RESULT: <n>` for `add` or `multiply`
/// (case-insensitive, wrapping 32-bit arithmetic). Any other argument count
/// runs the self-check, which greets and writes a `Startup Check:` line.
pub struct MathModule {
    channel: Arc<dyn DiagnosticChannel>,
}

impl MathModule {
    pub fn new(channel: Arc<dyn DiagnosticChannel>) -> Self {
        Self { channel }
    }

    fn calculate(&self, op: &str, a: &str, b: &str) -> Result<(), VmError> {
        let a = parse_operand(a)?;
        let b = parse_operand(b)?;
        if op.eq_ignore_ascii_case("add") {
            self.emit_result(a.wrapping_add(b));
        } else if op.eq_ignore_ascii_case("multiply") {
            self.emit_result(a.wrapping_mul(b));
        } else {
            self.channel.log(&[&format!("Unknown operation: {op}")]);
        }
        Ok(())
    }

    fn emit_result(&self, value: i32) {
        self.channel.log(&[&format!("{RESULT_MARKER} {value}")]);
    }

    fn self_check(&self) {
        self.channel.log(&[GREETING]);
        self.channel.log(&[&format!(
            "{STARTUP_CHECK_MARKER} {CHECK_A} + {CHECK_B} = {}",
            CHECK_A.wrapping_add(CHECK_B)
        )]);
    }
}

fn parse_operand(text: &str) -> Result<i32, VmError> {
    text.parse::<i32>()
        .map_err(|_| VmError::Invocation(format!("invalid integer operand \"{text}\"")))
}

#[async_trait]
impl VmModule for MathModule {
    fn name(&self) -> &str {
        "builtin-math"
    }

    async fn run(&self, args: Vec<String>) -> Result<(), VmError> {
        match args.as_slice() {
            [op, a, b] => self.calculate(op, a, b),
            _ => {
                self.self_check();
                Ok(())
            }
        }
    }
}
