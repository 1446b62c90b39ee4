//! Execution of script notes.
//!
//! A script note's body is handed to `sh -c` verbatim and runs with the
//! privileges of this process; the only containment is a hard wall-clock
//! deadline. Output is captured incrementally so that a timed-out or failed
//! run still reports everything the script printed before it died.

use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::NoteKind;

pub const SCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of one script run. Execution failures (non-zero exit, timeout)
/// land in `success`/`error`, not in the outer `Result`; only precondition
/// and spawn problems do.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptOutcome {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Runs the body of the script note `note_id` under the default 30-second
/// deadline.
pub async fn run(db: &Database, note_id: Uuid) -> Result<ScriptOutcome> {
    run_with_timeout(db, note_id, SCRIPT_TIMEOUT).await
}

pub async fn run_with_timeout(
    db: &Database,
    note_id: Uuid,
    deadline: Duration,
) -> Result<ScriptOutcome> {
    let note = db.get_note(note_id)?.ok_or(Error::NotFound("note"))?;
    if note.kind != NoteKind::Script {
        return Err(Error::InvalidType {
            expected: "script",
            actual: note.kind.as_str(),
        });
    }
    let body = note.content_md.trim().to_string();
    if body.is_empty() {
        return Err(Error::EmptyInput("script body"));
    }

    tracing::info!(note = %note_id, "running script note");
    run_command(&body, deadline).await
}

async fn run_command(body: &str, deadline: Duration) -> Result<ScriptOutcome> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(body)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let (stdout_buf, stdout_task) = capture(child.stdout.take());
    let (stderr_buf, stderr_task) = capture(child.stderr.take());

    let (success, error) = match tokio::time::timeout(deadline, child.wait()).await {
        Ok(Ok(status)) => {
            let error = (!status.success()).then(|| format!("script exited with {status}"));
            (status.success(), error)
        }
        Ok(Err(err)) => (false, Some(format!("failed to wait for script: {err}"))),
        Err(_elapsed) => {
            if let Err(err) = child.start_kill() {
                tracing::warn!(%err, "failed to kill timed-out script");
            }
            let _ = child.wait().await;
            tracing::warn!(?deadline, "script timed out");
            (false, Some(format!("script timed out after {deadline:?}")))
        }
    };

    // A killed child can leave orphaned grandchildren holding the pipes open,
    // so the readers get a short grace period and are then abandoned; the
    // shared buffers already hold whatever was written.
    for task in [stdout_task, stderr_task] {
        if tokio::time::timeout(Duration::from_millis(250), task)
            .await
            .is_err()
        {
            // reader abandoned; buffer keeps the partial output
        }
    }

    let stdout = String::from_utf8_lossy(&take(&stdout_buf)).into_owned();
    let stderr = String::from_utf8_lossy(&take(&stderr_buf)).into_owned();
    Ok(ScriptOutcome {
        stdout,
        stderr,
        success,
        error,
    })
}

type SharedBuf = Arc<Mutex<Vec<u8>>>;

/// Drains a pipe into a shared buffer chunk by chunk, so partial output
/// survives a timeout.
fn capture<R>(pipe: Option<R>) -> (SharedBuf, JoinHandle<()>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buf: SharedBuf = Arc::new(Mutex::new(Vec::new()));
    let writer = buf.clone();
    let task = tokio::spawn(async move {
        let Some(mut pipe) = pipe else { return };
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => writer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend_from_slice(&chunk[..n]),
            }
        }
    });
    (buf, task)
}

fn take(buf: &SharedBuf) -> Vec<u8> {
    std::mem::take(&mut *buf.lock().unwrap_or_else(PoisonError::into_inner))
}
