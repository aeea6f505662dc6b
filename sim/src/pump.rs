//! Child process supervision
//!
//! [`Pump::spawn`] starts the simulator binary and wires it up as three
//! message streams plus a stdin sink and a control signal:
//!
//! - stdout, framed on blank lines (a simulator message is everything
//!   up to the next `\n\n`)
//! - stderr, framed per line
//! - I/O errors from either direction
//!
//! Two reader tasks pump the pipes; a coordinator task owns the child,
//! performs stdin writes, and kills the process when told to - or when
//! both readers report completion, which is how a child exiting on its
//! own is noticed. EOF counts as completion, not as an error.

use std::io;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc;
use tracing::debug;

/// Simulator messages are divided by a blank line
const MESSAGE_END: &str = "\n\n";

const CHANNEL_BUFFER_SIZE: usize = 64;
const READ_BUFFER_SIZE: usize = 1024;

/// Handles onto a running child process
pub struct Pump {
    /// Writes are forwarded verbatim to the child's stdin
    pub stdin: mpsc::Sender<String>,

    /// Any message kills the child and tears the pump down
    pub ctrl: mpsc::Sender<()>,

    /// Framed stdout messages
    pub stdout: mpsc::Receiver<String>,

    /// Stderr lines
    pub stderr: mpsc::Receiver<String>,

    /// Asynchronous I/O failures from the readers or stdin writes
    pub errors: mpsc::Receiver<io::Error>,
}

impl Pump {
    /// Spawn the child and launch the reader and coordinator tasks.
    /// Failure to spawn is returned directly; everything after that
    /// arrives through the channels.
    pub fn spawn(binary: &str, args: &[&str]) -> io::Result<Pump> {
        Self::spawn_with(binary, args, MESSAGE_END)
    }

    /// As [`Pump::spawn`] with a custom stdout frame separator (some
    /// subcommands, e.g. `unpack-team`, answer in single lines)
    pub fn spawn_with(binary: &str, args: &[&str], separator: &'static str) -> io::Result<Pump> {
        let mut child = Command::new(binary)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let child_stdin = take_pipe(child.stdin.take(), "stdin")?;
        let child_stdout = take_pipe(child.stdout.take(), "stdout")?;
        let child_stderr = take_pipe(child.stderr.take(), "stderr")?;

        // stdin is deliberately unbuffered so a writer pairs with the
        // coordinator and observes backpressure
        let (stdin_tx, stdin_rx) = mpsc::channel(1);
        let (ctrl_tx, ctrl_rx) = mpsc::channel(1);
        let (stdout_tx, stdout_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let (stderr_tx, stderr_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let (error_tx, error_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let (done_tx, done_rx) = mpsc::channel(2);

        tokio::spawn(read_pump(child_stdout, stdout_tx, done_tx.clone(), separator));
        tokio::spawn(read_pump(child_stderr, stderr_tx, done_tx, "\n"));
        tokio::spawn(coordinate(
            child,
            child_stdin,
            stdin_rx,
            ctrl_rx,
            done_rx,
            error_tx,
        ));

        Ok(Pump {
            stdin: stdin_tx,
            ctrl: ctrl_tx,
            stdout: stdout_rx,
            stderr: stderr_rx,
            errors: error_rx,
        })
    }
}

fn take_pipe<T>(pipe: Option<T>, name: &str) -> io::Result<T> {
    pipe.ok_or_else(|| io::Error::other(format!("child {} pipe was not captured", name)))
}

/// Splits off every complete message in the buffer, leaving the
/// trailing partial behind
fn split_messages(buffer: &mut String, separator: &str) -> Vec<String> {
    let mut messages = Vec::new();
    while let Some(idx) = buffer.find(separator) {
        messages.push(buffer[..idx].to_string());
        buffer.drain(..idx + separator.len());
    }
    messages
}

/// Reads a pipe to completion, emitting framed messages. Reports once
/// on the done channel: None for EOF, the error otherwise.
async fn read_pump<R>(
    mut src: R,
    drain: mpsc::Sender<String>,
    done: mpsc::Sender<Option<io::Error>>,
    separator: &'static str,
) where
    R: AsyncRead + Unpin,
{
    let mut so_far = String::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];

    loop {
        match src.read(&mut buf).await {
            Ok(0) => {
                let _ = done.send(None).await;
                return;
            }
            Ok(n) => {
                // strip NUL padding before it reaches the parsers
                let chunk = String::from_utf8_lossy(&buf[..n]).replace('\0', "");
                so_far.push_str(&chunk);

                for message in split_messages(&mut so_far, separator) {
                    if drain.send(message).await.is_err() {
                        // receiver dropped, nobody cares anymore
                        return;
                    }
                }
            }
            Err(err) => {
                let _ = done.send(Some(err)).await;
                return;
            }
        }
    }
}

/// Owns the child: performs stdin writes, kills on control, and exits
/// once both readers have finished
async fn coordinate(
    mut child: Child,
    mut child_stdin: ChildStdin,
    mut stdin: mpsc::Receiver<String>,
    mut ctrl: mpsc::Receiver<()>,
    mut done: mpsc::Receiver<Option<io::Error>>,
    errors: mpsc::Sender<io::Error>,
) {
    let mut pumps_finished = 0;

    loop {
        tokio::select! {
            input = stdin.recv() => match input {
                Some(line) if !line.is_empty() => {
                    debug!(line = line.trim_end(), "sim write");
                    if let Err(err) = child_stdin.write_all(line.as_bytes()).await {
                        let _ = errors.send(err).await;
                    }
                }
                Some(_) => {}
                // stdin sink closed: the owner is done with us
                None => break,
            },
            _ = ctrl.recv() => break,
            finished = done.recv() => {
                match finished {
                    Some(Some(err)) => {
                        let _ = errors.send(err).await;
                        pumps_finished += 1;
                    }
                    Some(None) => pumps_finished += 1,
                    None => break,
                }
                if pumps_finished >= 2 {
                    break;
                }
            }
        }
    }

    if let Err(err) = child.kill().await {
        // the child exiting on its own lands here; nothing to do
        debug!(error = %err, "simulator already gone");
    }
    // dropping the pipe and channel ends closes everything the caller
    // still holds
}
