//! `docker compose` runner
//!
//! Shells out to the docker CLI. Streaming operations relay stdout and
//! stderr line by line into a bounded channel that always closes when the
//! process ends.

use crate::{
    ComposeOperation, ComposeOutput, ComposeRunner, ComposeTarget, OutputLine, ProviderError,
    Result,
};
use async_trait::async_trait;
use stackman_config::validate_stack_file;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

/// Capacity of the streaming output channel
pub const STREAM_BUFFER: usize = 100;

/// Compose runner backed by the docker CLI
#[derive(Debug, Clone)]
pub struct ComposeCli {
    /// Program to invoke ("docker")
    program: String,
}

impl Default for ComposeCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposeCli {
    pub fn new() -> Self {
        Self {
            program: "docker".to_string(),
        }
    }

    /// Use a different docker-compatible binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn validate(target: &ComposeTarget) -> Result<()> {
        validate_stack_file(&target.stack_file)
            .map_err(|e| ProviderError::Validation(e.to_string()))
    }

    fn build_command(&self, operation: ComposeOperation, target: &ComposeTarget) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("compose")
            .arg("-f")
            .arg(&target.stack_file)
            .args(operation.args());
        cmd.envs(compose_env(target));
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }
}

/// Environment every compose invocation receives on top of the inherited one
pub fn compose_env(target: &ComposeTarget) -> Vec<(String, String)> {
    vec![
        (
            "CODE_DIR".to_string(),
            target.code_dir.to_string_lossy().to_string(),
        ),
        (
            "COMPOSE_PROJECT_NAME".to_string(),
            target.project_name.clone(),
        ),
        ("PHPMYADMIN_IMAGE".to_string(), phpmyadmin_image()),
    ]
}

/// phpMyAdmin image for this host, overridable with `PHPMYADMIN_IMAGE`
pub fn phpmyadmin_image() -> String {
    match std::env::var("PHPMYADMIN_IMAGE") {
        Ok(image) if !image.is_empty() => image,
        _ if cfg!(target_arch = "aarch64") => "arm64v8/phpmyadmin:latest".to_string(),
        _ => "phpmyadmin/phpmyadmin:latest".to_string(),
    }
}

#[async_trait]
impl ComposeRunner for ComposeCli {
    async fn run(
        &self,
        operation: ComposeOperation,
        target: &ComposeTarget,
    ) -> Result<ComposeOutput> {
        Self::validate(target)?;

        tracing::debug!(
            "Running compose {} for project {}",
            operation,
            target.project_name
        );

        let output = self.build_command(operation, target).output().await?;

        let mut combined_output = String::from_utf8_lossy(&output.stdout).to_string();
        combined_output.push_str(&String::from_utf8_lossy(&output.stderr));

        let success = output.status.success();
        let error = if success {
            None
        } else {
            Some(format!("compose {} failed: {}", operation, output.status))
        };

        Ok(ComposeOutput {
            success,
            combined_output,
            error,
        })
    }

    fn stream(
        &self,
        operation: ComposeOperation,
        target: &ComposeTarget,
    ) -> Result<mpsc::Receiver<OutputLine>> {
        Self::validate(target)?;

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let cmd = self.build_command(operation, target);

        tracing::info!(
            "Streaming compose {} for project {}",
            operation,
            target.project_name
        );

        tokio::spawn(relay(cmd, tx));

        Ok(rx)
    }
}

/// Run the process and forward its output; dropping `tx` closes the channel
async fn relay(mut cmd: Command, tx: mpsc::Sender<OutputLine>) {
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            let _ = tx
                .send(OutputLine::parse(format!(
                    "ERROR: Failed to start command: {}",
                    e
                )))
                .await;
            return;
        }
    };

    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => (stdout, stderr),
        (None, _) => {
            abort(&mut child).await;
            let _ = tx
                .send(OutputLine::parse("ERROR: Failed to create stdout pipe"))
                .await;
            return;
        }
        (_, None) => {
            abort(&mut child).await;
            let _ = tx
                .send(OutputLine::parse("ERROR: Failed to create stderr pipe"))
                .await;
            return;
        }
    };

    // Both pipes are drained together so neither can fill up and stall the child.
    let mut stdout = Some(BufReader::new(stdout));
    let mut stderr = Some(BufReader::new(stderr));
    let (mut stdout_buf, mut stderr_buf) = (Vec::new(), Vec::new());
    let mut forwarding = true;

    while stdout.is_some() || stderr.is_some() {
        let result = tokio::select! {
            result = async {
                match stdout.as_mut() {
                    Some(reader) => read_line(reader, &mut stdout_buf).await,
                    None => std::future::pending().await,
                }
            } => (true, result),
            result = async {
                match stderr.as_mut() {
                    Some(reader) => read_line(reader, &mut stderr_buf).await,
                    None => std::future::pending().await,
                }
            } => (false, result),
        };

        let line = match result {
            (_, Ok(Some(line))) => OutputLine::parse(line),
            (from_stdout, Ok(None)) => {
                if from_stdout {
                    stdout = None;
                } else {
                    stderr = None;
                }
                continue;
            }
            (from_stdout, Err(e)) => {
                if from_stdout {
                    stdout = None;
                } else {
                    stderr = None;
                }
                OutputLine::parse(format!("ERROR: Stream read error: {}", e))
            }
        };

        // Bounded send: a slow reader pauses the relay here. Once the reader
        // is gone the process keeps running and its output is discarded.
        if forwarding && tx.send(line).await.is_err() {
            tracing::debug!("Compose output receiver dropped, draining remaining output");
            forwarding = false;
        }
    }

    let last = match child.wait().await {
        Ok(status) if status.success() => OutputLine::Complete,
        Ok(status) => OutputLine::parse(format!("ERROR: Command failed: {}", status)),
        Err(e) => OutputLine::parse(format!("ERROR: Command failed: {}", e)),
    };
    tracing::debug!("Compose process finished: {}", last);
    let _ = tx.send(last).await;
}

/// Next line from a compose pipe, or `None` at end of stream
///
/// Bytes that are not UTF-8 are replaced rather than treated as errors.
/// `buf` holds partial input across cancelled calls and is cleared once a
/// line is returned.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    reader.read_until(b'\n', buf).await?;
    if buf.is_empty() {
        return Ok(None);
    }

    let mut end = buf.len();
    while end > 0 && matches!(buf[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    let line = String::from_utf8_lossy(&buf[..end]).into_owned();
    buf.clear();
    Ok(Some(line))
}

async fn abort(child: &mut Child) {
    if let Err(e) = child.kill().await {
        tracing::debug!("Failed to kill compose process: {}", e);
    }
}
