//! Recognition engine subprocess.
//!
//! The engine is a separate program talking the line protocol in
//! `transcoder` over its stdin/stdout. `EngineSession` owns the child and
//! both pipes. Requests are written and flushed synchronously. Responses are
//! read on a helper thread that only forwards whole lines over a channel;
//! all pad state is touched by whoever drains that channel, one line at a
//! time.
//!
//! Every transport failure is fatal. There is no restart and no retry.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// File name of the engine executable.
pub const ENGINE_NAME: &str = "kpengine";

/// Directory the engine is installed in when no override is given.
pub const DEFAULT_BINDIR: &str = match option_env!("KANJIPAD_BINDIR") {
    Some(dir) => dir,
    None => "/usr/local/bin",
};

/// Anything that can carry an encoded request to the engine.
pub trait RequestSink {
    fn send_request(&mut self, request: &[u8]) -> Result<()>;
}

/// What the reader thread saw on the engine's stdout.
#[derive(Debug)]
pub enum EngineMessage {
    /// One complete line, newline included when present
    Line(String),
    /// End of stream: the engine exited
    Closed,
    /// Reading failed
    Failed(std::io::Error),
}

/// Program and arguments used to launch the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl EngineCommand {
    /// Launch `program` with no arguments.
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        EngineCommand {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Launch `program`, forwarding `--data-file` when a data file is given.
    pub fn kpengine<P: Into<PathBuf>>(program: P, data_file: Option<&Path>) -> Self {
        let mut command = Self::new(program);
        if let Some(path) = data_file {
            command = command.arg("--data-file").arg(path);
        }
        command
    }

    /// Pick the engine executable.
    ///
    /// A `kpengine` in the working directory wins (running from a build
    /// tree), then `configured`, then the install location.
    pub fn resolve(configured: Option<&Path>, data_file: Option<&Path>) -> Self {
        let uninstalled = Path::new(".").join(ENGINE_NAME);
        let program = if uninstalled.exists() {
            uninstalled
        } else if let Some(path) = configured {
            path.to_path_buf()
        } else {
            Path::new(DEFAULT_BINDIR).join(ENGINE_NAME)
        };
        Self::kpengine(program, data_file)
    }

    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

/// A running engine with its two pipes.
pub struct EngineSession {
    child: Child,
    to_engine: Option<ChildStdin>,
    from_engine: Receiver<EngineMessage>,
    reader: Option<JoinHandle<()>>,
}

impl EngineSession {
    /// Spawn the engine and start watching its output.
    pub fn start(command: &EngineCommand) -> Result<Self> {
        let launch_error = |source: std::io::Error| Error::EngineLaunch {
            program: command.program.display().to_string(),
            source,
        };

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(launch_error)?;

        let pipes_missing =
            || std::io::Error::new(std::io::ErrorKind::BrokenPipe, "engine pipes not available");
        let to_engine = child.stdin.take().ok_or_else(|| launch_error(pipes_missing()))?;
        let stdout = child.stdout.take().ok_or_else(|| launch_error(pipes_missing()))?;

        let (tx, rx) = unbounded();
        let reader = thread::Builder::new()
            .name("engine-reader".into())
            .spawn(move || read_engine_output(stdout, tx))
            .map_err(launch_error)?;

        info!(program = %command.program.display(), pid = child.id(), "engine started");
        Ok(EngineSession {
            child,
            to_engine: Some(to_engine),
            from_engine: rx,
            reader: Some(reader),
        })
    }

    /// Process id of the engine.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Channel of engine output, for select loops.
    pub fn messages(&self) -> &Receiver<EngineMessage> {
        &self.from_engine
    }

    /// Block until the next engine line.
    pub fn next_line(&self) -> Result<String> {
        match self.from_engine.recv() {
            Ok(message) => line_or_error(message),
            // reader thread gone without a message: treat as closed
            Err(_) => Err(Error::EngineClosed),
        }
    }

    /// Like `next_line`, giving up after `timeout` with `Ok(None)`.
    pub fn next_line_timeout(&self, timeout: Duration) -> Result<Option<String>> {
        match self.from_engine.recv_timeout(timeout) {
            Ok(message) => line_or_error(message).map(Some),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::EngineClosed),
        }
    }
}

/// Turn one reader message into a line or the fatal error it stands for.
pub fn line_or_error(message: EngineMessage) -> Result<String> {
    match message {
        EngineMessage::Line(line) => Ok(line),
        EngineMessage::Closed => Err(Error::EngineClosed),
        EngineMessage::Failed(err) => Err(Error::EngineRead(err)),
    }
}

impl RequestSink for EngineSession {
    fn send_request(&mut self, request: &[u8]) -> Result<()> {
        let pipe = self.to_engine.as_mut().ok_or(Error::EngineClosed)?;
        pipe.write_all(request).map_err(Error::EngineWrite)?;
        pipe.flush().map_err(Error::EngineFlush)?;
        debug!(bytes = request.len(), "request sent");
        Ok(())
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        // closing stdin lets a well-behaved engine exit on its own
        self.to_engine.take();
        let pid = self.pid();
        if let Err(err) = self.child.kill() {
            debug!(pid, %err, "engine already gone");
        }
        match self.child.wait() {
            Ok(status) => debug!(pid, %status, "engine stopped"),
            Err(err) => warn!(pid, %err, "could not reap engine"),
        }
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}

fn read_engine_output(stdout: ChildStdout, tx: Sender<EngineMessage>) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let message = match reader.read_until(b'\n', &mut buf) {
            Ok(0) => EngineMessage::Closed,
            Ok(_) => EngineMessage::Line(String::from_utf8_lossy(&buf).into_owned()),
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => EngineMessage::Failed(err),
        };
        let last = !matches!(message, EngineMessage::Line(_));
        if tx.send(message).is_err() || last {
            return;
        }
    }
}
