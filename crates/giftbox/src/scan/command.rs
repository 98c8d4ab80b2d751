//! Camera scanning through an external decoder process.
//!
//! The decoder (e.g. `zbarcam --raw`) owns the camera and prints one
//! decoded payload per line on stdout.

use giftbox_common::GiftboxError;
use giftbox_common::constants::DECODE_CHANNEL_CAPACITY;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::ScanCapability;

/// Scanner backed by a child process
pub struct CommandScanner {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
}

impl CommandScanner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
            reader: None,
        }
    }
}

impl ScanCapability for CommandScanner {
    fn start(&mut self) -> Result<mpsc::Receiver<String>, GiftboxError> {
        self.stop();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GiftboxError::CaptureUnavailable(format!("{}: {e}", self.program)))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            GiftboxError::CaptureUnavailable(format!("{}: no output stream", self.program))
        })?;

        let (tx, rx) = mpsc::channel(DECODE_CHANNEL_CAPACITY);
        let program = self.program.clone();

        let reader = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.is_empty() {
                            continue;
                        }
                        if tx.send(line).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::info!(program = %program, "Decoder exited");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(program = %program, error = %e, "Decoder output unreadable");
                        break;
                    }
                }
            }
        });

        tracing::info!(program = %self.program, pid = ?child.id(), "Camera decoder started");

        self.child = Some(child);
        self.reader = Some(reader);
        Ok(rx)
    }

    fn stop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }

        if let Some(mut child) = self.child.take() {
            match child.start_kill() {
                Ok(()) => tracing::info!(program = %self.program, "Camera decoder stopped"),
                // Already exited on its own
                Err(e) => tracing::debug!(program = %self.program, error = %e, "Decoder kill skipped"),
            }
        }
    }

    fn is_active(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for CommandScanner {
    fn drop(&mut self) {
        self.stop();
    }
}
