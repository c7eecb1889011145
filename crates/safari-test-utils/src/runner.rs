//! [`FakeRunner`] for exercising the dispatcher without spawning processes.

use std::collections::VecDeque;
use std::sync::Mutex;

use safari_script::{CommandRunner, Error, Invocation, Result};

/// What the fake returns for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeResponse {
    /// Successful exit with this stdout (trimmed, as the real runner does)
    Stdout(String),
    /// Non-zero exit with this stderr
    Failure(String),
    /// The program could not be found
    SpawnError,
}

/// A [`CommandRunner`] that replays queued responses and records every call.
///
/// Queued responses are consumed in order; once the queue is empty every
/// call gets the fallback response.
///
/// # Example
///
/// ```rust
/// use safari_script::{CommandRunner, Invocation};
/// use safari_test_utils::FakeRunner;
///
/// let runner = FakeRunner::replying("42");
/// let out = runner.run(&Invocation::new("osascript", vec![])).unwrap();
/// assert_eq!(out, "42");
/// assert_eq!(runner.call_count(), 1);
/// ```
#[derive(Debug)]
pub struct FakeRunner {
    queue: Mutex<VecDeque<FakeResponse>>,
    fallback: FakeResponse,
    calls: Mutex<Vec<Invocation>>,
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRunner {
    /// Every call succeeds with empty stdout.
    pub fn new() -> Self {
        Self::with_fallback(FakeResponse::Stdout(String::new()))
    }

    /// Every call succeeds with `stdout`.
    pub fn replying(stdout: &str) -> Self {
        Self::with_fallback(FakeResponse::Stdout(stdout.to_string()))
    }

    /// Every call fails with `stderr`.
    pub fn failing(stderr: &str) -> Self {
        Self::with_fallback(FakeResponse::Failure(stderr.to_string()))
    }

    pub fn with_fallback(fallback: FakeResponse) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-off successful response.
    pub fn then_reply(self, stdout: &str) -> Self {
        self.push(FakeResponse::Stdout(stdout.to_string()))
    }

    /// Queue a one-off failure.
    pub fn then_fail(self, stderr: &str) -> Self {
        self.push(FakeResponse::Failure(stderr.to_string()))
    }

    fn push(self, response: FakeResponse) -> Self {
        self.queue.lock().unwrap().push_back(response);
        self
    }

    /// Every invocation seen so far, oldest first.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// AppleScript source of the most recent `osascript -e` call.
    pub fn last_script(&self) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|call| call.script().map(str::to_string))
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        self.calls.lock().unwrap().push(invocation.clone());

        let response = self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match response {
            FakeResponse::Stdout(stdout) => Ok(stdout.trim().to_string()),
            FakeResponse::Failure(stderr) => Err(Error::Failed {
                program: invocation.program.clone(),
                status: "exit status: 1".to_string(),
                stderr,
            }),
            FakeResponse::SpawnError => Err(Error::Spawn {
                program: invocation.program.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "No such file or directory",
                ),
            }),
        }
    }
}
