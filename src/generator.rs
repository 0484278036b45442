use std::env;
use std::fmt;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// how long the pipes may stay open once the generator has exited
const READER_GRACE: Duration = Duration::from_millis(100);

/// why generation fell back to the default message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NotFound,
    NonZeroExit { code: Option<i32>, stderr: String },
    EmptyOutput,
    Timeout(u64),
    InvocationError(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "generator not found"),
            Self::NonZeroExit {
                code: Some(code), ..
            } => write!(f, "generator exited with code {code}"),
            Self::NonZeroExit { code: None, .. } => write!(f, "generator was terminated by a signal"),
            Self::EmptyOutput => write!(f, "generator returned no output"),
            Self::Timeout(secs) => write!(f, "generator timed out after {secs}s"),
            Self::InvocationError(e) => write!(f, "failed to run generator: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(String),
    Fallback {
        reason: FallbackReason,
        default_message: String,
    },
}

impl GenerationOutcome {
    /// the message to commit with, generated or not
    pub fn message(&self) -> &str {
        match self {
            Self::Generated(message) => message,
            Self::Fallback {
                default_message, ..
            } => default_message,
        }
    }
}

/// runs the external text generator (`<program> -m <model> -p <prompt>`)
#[derive(Debug, Clone)]
pub struct GeneratorClient {
    pub program: String,
    pub model: String,
    pub default_message: String,
    /// the generator runs here, and a relative `program` path is resolved from here
    pub cwd: PathBuf,
}

impl GeneratorClient {
    pub fn new(program: &str, model: &str, default_message: &str, cwd: &Path) -> Self {
        Self {
            program: program.to_string(),
            model: model.to_string(),
            default_message: default_message.to_string(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// whether the generator executable can be found
    pub fn is_available(&self) -> bool {
        self.resolve().is_some()
    }

    /// absolute path of the generator: bare names are looked up on PATH, paths
    /// are taken relative to `cwd`
    fn resolve(&self) -> Option<PathBuf> {
        let program = which::which_in(&self.program, env::var_os("PATH"), &self.cwd).ok()?;
        std::path::absolute(program).ok()
    }

    /// generate a message, blocking until the generator exits or `timeout` elapses
    ///
    /// the returned message is only trimmed; quote stripping is left to the caller
    pub fn generate(&self, prompt: &str, timeout: Duration) -> GenerationOutcome {
        match self.invoke(prompt, timeout) {
            Ok(message) => GenerationOutcome::Generated(message),
            Err(reason) => GenerationOutcome::Fallback {
                reason,
                default_message: self.default_message.clone(),
            },
        }
    }

    fn invoke(&self, prompt: &str, timeout: Duration) -> Result<String, FallbackReason> {
        let program = self.resolve().ok_or(FallbackReason::NotFound)?;

        // the prompt is a single argument, no shell involved
        let started = Instant::now();
        let mut child = Command::new(program)
            .args(["-m", self.model.as_str(), "-p", prompt])
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FallbackReason::InvocationError(e.to_string()))?;

        // drain both pipes in the background so a chatty child can't block on a full pipe
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        match child.wait_timeout(timeout) {
            Ok(Some(status)) => {
                // anything the generator left running may hold the pipes open,
                // so reading is bounded by the same timeout
                let deadline = (started + timeout).max(Instant::now() + READER_GRACE);
                let stdout = collect(stdout, deadline);
                let stderr = collect(stderr, deadline);

                if !status.success() {
                    return Err(FallbackReason::NonZeroExit {
                        code: status.code(),
                        stderr: stderr.trim().to_string(),
                    });
                }

                let message = stdout.trim();
                if message.is_empty() {
                    return Err(FallbackReason::EmptyOutput);
                }
                Ok(message.to_string())
            }
            Ok(None) => {
                // the reader threads are left behind; they finish once the pipes close
                let _ = child.kill();
                let _ = child.wait();
                Err(FallbackReason::Timeout(timeout.as_secs()))
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(FallbackReason::InvocationError(e.to_string()))
            }
        }
    }
}

/// forward everything read from `pipe` in chunks until it closes
fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(_) => break,
            }
        }
    });
    rx
}

/// gather what a pipe produced until it closes or `deadline` passes
fn collect(chunks: Option<Receiver<Vec<u8>>>, deadline: Instant) -> String {
    let mut data = Vec::new();
    if let Some(chunks) = chunks {
        while let Ok(chunk) =
            chunks.recv_timeout(deadline.saturating_duration_since(Instant::now()))
        {
            data.extend_from_slice(&chunk);
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}
