use std::{ffi::OsStr, process::Stdio, time::Duration};

use anyhow::{bail, Context};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub code: i32,
    pub out: Vec<u8>,
    pub err: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

/// Run `program args...`, optionally feeding `stdin`, and collect its output.
/// The child is killed if it outlives `timeout`.
pub async fn run_cmd<S: AsRef<OsStr>>(
    program: S,
    args: &[String],
    stdin: Option<&[u8]>,
    timeout: Duration,
) -> Result<CommandResult, CommandError> {
    let program_name = program.as_ref().to_string_lossy().to_string();
    tracing::debug!(program = %program_name, ?args, ?timeout, "Attempting to run_cmd");

    let mut child = Command::new(&program)
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CommandError::Spawn {
            program: program_name.clone(),
            source,
        })?;

    let pipe = child.stdin.take();
    let run = async {
        // Feed stdin while the child's output is drained, so a child that
        // fails before reading everything still reports its own stderr.
        let (written, output) =
            tokio::join!(write_stdin(pipe, stdin), child.wait_with_output());
        written?;
        output.context("Failed to wait for child process")
    };

    let output = match tokio::time::timeout(timeout, run).await {
        Ok(output) => output?,
        Err(_) => {
            return Err(CommandError::Timeout {
                program: program_name,
                timeout,
            })
        }
    };

    let code = output.status.code().unwrap_or(1);
    let err = String::from_utf8_lossy(&output.stderr).to_string();

    Ok(CommandResult {
        code,
        out: output.stdout,
        err,
    })
}

async fn write_stdin(
    pipe: Option<tokio::process::ChildStdin>,
    input: Option<&[u8]>,
) -> anyhow::Result<()> {
    let (Some(mut pipe), Some(input)) = (pipe, input) else {
        return Ok(());
    };
    // `pipe` is dropped on return, closing stdin so the child sees
    // end-of-stream.
    match pipe.write_all(input).await {
        Ok(()) => Ok(()),
        // The child exited without reading all of its input; its exit
        // status and stderr say why.
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            tracing::debug!("Child closed stdin before reading all input");
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context("Failed to write to child stdin")),
    }
}

/// Split a `[program, args...]` list as stored in settings.
pub fn split_command(cmd: &[String]) -> anyhow::Result<(&String, &[String])> {
    match cmd.split_first() {
        Some((program, args)) => Ok((program, args)),
        None => bail!("Empty command"),
    }
}
