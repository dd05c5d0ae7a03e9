//! Running `yt-dlp` as a child process.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::error::{SourceError, SourceResult};

const TOOL: &str = "yt-dlp";

fn command(program: &Path, args: &[OsString]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .env("PYTHONUNBUFFERED", "1");
    cmd
}

fn spawn_error(e: &std::io::Error) -> SourceError {
    if e.kind() == std::io::ErrorKind::NotFound {
        SourceError::ToolMissing {
            tool: TOOL.to_string(),
        }
    } else {
        SourceError::Process {
            tool: TOOL.to_string(),
            message: format!("Failed to spawn: {e}"),
        }
    }
}

fn failure(status: std::process::ExitStatus, stderr: &[u8]) -> SourceError {
    let stderr_text = String::from_utf8_lossy(stderr).trim().to_string();
    let message = if stderr_text.is_empty() {
        format!("exited with status {status}")
    } else {
        last_error_line(&stderr_text)
    };
    SourceError::Process {
        tool: TOOL.to_string(),
        message,
    }
}

/// The most useful line of a `yt-dlp` stderr dump.
fn last_error_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|line| line.starts_with("ERROR"))
        .or_else(|| stderr.lines().rev().find(|line| !line.trim().is_empty()))
        .unwrap_or(stderr)
        .trim()
        .to_string()
}

/// Run to completion and return stdout.
pub async fn run_capture(program: &Path, args: &[OsString]) -> SourceResult<String> {
    let output = command(program, args)
        .output()
        .await
        .map_err(|e| spawn_error(&e))?;

    if !output.status.success() {
        return Err(failure(output.status, &output.stderr));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run while feeding every stdout line to `on_line`.
///
/// Dropping the returned future kills the child.
pub async fn run_streaming<F>(program: &Path, args: &[OsString], mut on_line: F) -> SourceResult<()>
where
    F: FnMut(&str) + Send,
{
    let mut child = command(program, args)
        .spawn()
        .map_err(|e| spawn_error(&e))?;

    let stdout = child.stdout.take().ok_or_else(|| SourceError::Process {
        tool: TOOL.to_string(),
        message: "Missing stdout".to_string(),
    })?;
    let stderr = child.stderr.take().ok_or_else(|| SourceError::Process {
        tool: TOOL.to_string(),
        message: "Missing stderr".to_string(),
    })?;

    let mut stderr_reader = BufReader::new(stderr);
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_reader.read_to_end(&mut buf).await;
        buf
    });

    let mut lines = BufReader::new(stdout).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if !line.is_empty() {
            on_line(line);
        }
    }

    let status = child.wait().await?;
    let stderr_buf = stderr_task.await.unwrap_or_default();
    if !status.success() {
        return Err(failure(status, &stderr_buf));
    }
    Ok(())
}
