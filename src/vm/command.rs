use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use super::{VmError, VmModule};
use crate::output::DiagnosticChannel;

/// Module backed by an external executable.
///
/// Every `run` spawns the program with its configured leading arguments
/// followed by the invocation arguments. Each stdout line goes to the
/// diagnostic channel as it arrives; a non-zero exit rejects with stderr.
pub struct CommandModule {
    program: PathBuf,
    base_args: Vec<String>,
    channel: Arc<dyn DiagnosticChannel>,
}

impl CommandModule {
    pub fn new(
        program: PathBuf,
        base_args: Vec<String>,
        channel: Arc<dyn DiagnosticChannel>,
    ) -> Self {
        Self {
            program,
            base_args,
            channel,
        }
    }
}

#[async_trait]
impl VmModule for CommandModule {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("command")
    }

    async fn run(&self, args: Vec<String>) -> Result<(), VmError> {
        let mut child = Command::new(&self.program)
            .args(&self.base_args)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                VmError::Invocation(format!("failed to start {}: {err}", self.program.display()))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VmError::Invocation("module stdout unavailable".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| VmError::Invocation("module stderr unavailable".to_string()))?;

        let forward = async {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                if reader.read_until(b'\n', &mut buf).await? == 0 {
                    break;
                }
                let line = String::from_utf8_lossy(&buf);
                self.channel.log(&[line.trim_end_matches(['\n', '\r'])]);
            }
            Ok::<(), std::io::Error>(())
        };
        let collect_stderr = async {
            let mut text = String::new();
            stderr.read_to_string(&mut text).await.map(|_| text)
        };

        let (forwarded, stderr_text) = tokio::join!(forward, collect_stderr);
        forwarded.map_err(|err| VmError::Invocation(format!("reading module output: {err}")))?;
        let stderr_text = stderr_text.unwrap_or_default();

        let status = child
            .wait()
            .await
            .map_err(|err| VmError::Invocation(format!("waiting for module: {err}")))?;
        if status.success() {
            return Ok(());
        }

        let detail = stderr_text.trim();
        Err(VmError::Invocation(if detail.is_empty() {
            format!("module exited with {status}")
        } else {
            format!("module exited with {status}: {detail}")
        }))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl DiagnosticChannel for Lines {
        fn log(&self, args: &[&str]) {
            self.0.lock().push(args.join(" "));
        }
    }

    fn shell(script: &str, channel: Arc<Lines>) -> CommandModule {
        CommandModule::new(
            PathBuf::from("/bin/sh"),
            vec!["-c".to_string(), script.to_string(), "sh".to_string()],
            channel,
        )
    }

    #[tokio::test]
    async fn stdout_lines_reach_the_channel() {
        let lines = Arc::new(Lines::default());
        let module = shell(r#"echo "hello"; echo "RESULT: $1 $2 $3""#, Arc::clone(&lines));

        module
            .run(vec!["add".into(), "1".into(), "2".into()])
            .await
            .expect("run");

        assert_eq!(*lines.0.lock(), vec!["hello", "RESULT: add 1 2"]);
        assert_eq!(module.name(), "sh");
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_stop_forwarding() {
        let lines = Arc::new(Lines::default());
        let module = shell(r"printf 'bad \377 byte\r\nRESULT: ok\nlast'", Arc::clone(&lines));

        module.run(Vec::new()).await.expect("run");

        let lines = lines.0.lock();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "bad \u{FFFD} byte");
        assert_eq!(lines[1], "RESULT: ok");
        assert_eq!(lines[2], "last");
    }

    #[tokio::test]
    async fn non_zero_exit_rejects_with_stderr() {
        let lines = Arc::new(Lines::default());
        let module = shell("echo '  bad operand  ' >&2; exit 3", Arc::clone(&lines));

        let err = module.run(Vec::new()).await.unwrap_err();

        match err {
            VmError::Invocation(message) => assert!(message.ends_with(": bad operand"), "{message}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
