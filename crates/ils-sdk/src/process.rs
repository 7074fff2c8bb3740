//! SDK bridge process management

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, Notify};

use super::commands::{BridgeCommand, CommandSender, RequestTracker};
use ils_core::prelude::*;

/// Raw output of the bridge process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Stdout(String),
    Stderr(String),
    Exited { code: Option<i32> },
}

/// Manages the bridge child process.
///
/// The `Child` handle lives in a dedicated wait task so the real exit code is
/// reported as `BridgeEvent::Exited`. `BridgeProcess` keeps a kill channel, an
/// exit flag for synchronous checks and a [`Notify`] for awaiting exit.
pub struct BridgeProcess {
    stdin_tx: mpsc::Sender<String>,
    pid: Option<u32>,
    kill_tx: Option<oneshot::Sender<()>>,
    exited: Arc<AtomicBool>,
    exit_notify: Arc<Notify>,
}

impl BridgeProcess {
    /// Spawn the bridge executable.
    ///
    /// `command` is resolved through `PATH` first so a missing bridge is
    /// reported as [`Error::BridgeNotFound`] rather than a generic spawn error.
    pub fn spawn(
        command: &str,
        args: &[String],
        event_tx: mpsc::Sender<BridgeEvent>,
    ) -> Result<Self> {
        let program = which::which(command).map_err(|_| Error::BridgeNotFound {
            command: command.to_string(),
        })?;

        info!("Spawning SDK bridge: {} {}", program.display(), args.join(" "));

        let mut child = Command::new(&program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::BridgeNotFound {
                        command: command.to_string(),
                    }
                } else {
                    Error::BridgeSpawn {
                        reason: e.to_string(),
                    }
                }
            })?;

        let pid = child.id();
        info!("SDK bridge started with PID: {:?}", pid);

        let stdio = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        let (stdin, stdout, stderr) = match stdio {
            (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
            _ => {
                return Err(Error::BridgeSpawn {
                    reason: "bridge stdio was not captured".to_string(),
                })
            }
        };

        let (stdin_tx, stdin_rx) = mpsc::channel::<String>(32);
        tokio::spawn(Self::stdin_writer(stdin, stdin_rx));
        tokio::spawn(Self::stdout_reader(stdout, event_tx.clone()));
        tokio::spawn(Self::stderr_reader(stderr, event_tx.clone()));

        let exited = Arc::new(AtomicBool::new(false));
        let exit_notify = Arc::new(Notify::new());
        let (kill_tx, kill_rx) = oneshot::channel::<()>();

        tokio::spawn(Self::wait_for_exit(
            child,
            kill_rx,
            event_tx,
            Arc::clone(&exited),
            Arc::clone(&exit_notify),
        ));

        Ok(Self {
            stdin_tx,
            pid,
            kill_tx: Some(kill_tx),
            exited,
            exit_notify,
        })
    }

    /// Owns `child`; ends on natural exit or when `kill_rx` fires.
    async fn wait_for_exit(
        mut child: Child,
        kill_rx: oneshot::Receiver<()>,
        event_tx: mpsc::Sender<BridgeEvent>,
        exited: Arc<AtomicBool>,
        exit_notify: Arc<Notify>,
    ) {
        let code: Option<i32> = tokio::select! {
            result = child.wait() => {
                match result {
                    Ok(status) => {
                        info!("SDK bridge exited with status: {:?}", status);
                        status.code()
                    }
                    Err(e) => {
                        error!("Error waiting for SDK bridge: {}", e);
                        None
                    }
                }
            }
            _ = kill_rx => {
                info!("Kill signal received, force-killing SDK bridge");
                if let Err(e) = child.kill().await {
                    error!("Failed to kill SDK bridge: {}", e);
                }
                match child.wait().await {
                    Ok(status) => status.code(),
                    Err(e) => {
                        error!("Error waiting after kill: {}", e);
                        None
                    }
                }
            }
        };

        // Flag first so has_exited() is true before the event is observed
        exited.store(true, Ordering::Release);
        exit_notify.notify_waiters();

        debug!("Sending BridgeEvent::Exited {{ code: {:?} }}", code);
        let _ = event_tx.send(BridgeEvent::Exited { code }).await;
    }

    async fn stdout_reader(stdout: tokio::process::ChildStdout, tx: mpsc::Sender<BridgeEvent>) {
        let mut reader = BufReader::new(stdout).lines();

        while let Ok(Some(line)) = reader.next_line().await {
            trace!("bridge stdout: {}", line);
            if tx.send(BridgeEvent::Stdout(line)).await.is_err() {
                debug!("stdout channel closed");
                break;
            }
        }

        info!("bridge stdout reader finished");
    }

    async fn stderr_reader(stderr: tokio::process::ChildStderr, tx: mpsc::Sender<BridgeEvent>) {
        let mut reader = BufReader::new(stderr).lines();

        while let Ok(Some(line)) = reader.next_line().await {
            trace!("bridge stderr: {}", line);
            if tx.send(BridgeEvent::Stderr(line)).await.is_err() {
                debug!("stderr channel closed");
                break;
            }
        }

        debug!("bridge stderr reader finished");
    }

    async fn stdin_writer(mut stdin: tokio::process::ChildStdin, mut rx: mpsc::Receiver<String>) {
        while let Some(command) = rx.recv().await {
            debug!("Sending to bridge: {}", command);

            if let Err(e) = stdin.write_all(command.as_bytes()).await {
                error!("Failed to write to bridge stdin: {}", e);
                break;
            }
            if let Err(e) = stdin.write_all(b"\n").await {
                error!("Failed to write newline: {}", e);
                break;
            }
            if let Err(e) = stdin.flush().await {
                error!("Failed to flush bridge stdin: {}", e);
                break;
            }
        }

        debug!("bridge stdin writer finished");
    }

    /// Send a raw line to the bridge
    pub async fn send(&self, line: &str) -> Result<()> {
        self.stdin_tx
            .send(line.to_string())
            .await
            .map_err(|_| Error::channel_send("bridge stdin channel closed"))
    }

    /// Ask the bridge to leave and exit, force-killing it after `grace`.
    pub async fn shutdown(
        &mut self,
        cmd_sender: Option<&CommandSender>,
        grace: Duration,
    ) -> Result<()> {
        if self.has_exited() {
            info!("SDK bridge already exited, skipping shutdown");
            return Ok(());
        }

        info!("Initiating SDK bridge shutdown");

        if let Some(sender) = cmd_sender {
            if let Err(e) = sender
                .send_with_timeout(BridgeCommand::Leave, Duration::from_secs(1))
                .await
            {
                if self.has_exited() {
                    return Ok(());
                }
                warn!("Leave during shutdown failed (continuing): {}", e);
            }
        }

        let _ = self.send(r#"{"id":0,"method":"bridge.shutdown","params":{}}"#).await;

        // Register for the notification before the final check so it cannot be missed
        let notified = self.exit_notify.notified();
        if self.has_exited() {
            return Ok(());
        }

        match tokio::time::timeout(grace, notified).await {
            Ok(()) => {
                info!("SDK bridge exited gracefully");
                Ok(())
            }
            Err(_) => {
                warn!("Timeout waiting for SDK bridge exit, force killing");
                self.force_kill();
                Ok(())
            }
        }
    }

    fn force_kill(&mut self) {
        if let Some(tx) = self.kill_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        !self.has_exited()
    }

    pub fn id(&self) -> Option<u32> {
        self.pid
    }

    /// Create a command sender writing to this process
    pub fn command_sender(&self, tracker: Arc<RequestTracker>) -> CommandSender {
        CommandSender::new(self.stdin_tx.clone(), tracker)
    }
}

impl Drop for BridgeProcess {
    fn drop(&mut self) {
        if !self.has_exited() {
            warn!("BridgeProcess dropped while bridge may still be running");
            self.force_kill();
        }
        debug!("BridgeProcess dropped");
    }
}
