//! External command execution
//!
//! All I/O with the outside world goes through [`CommandRunner`]. The
//! production implementation, [`ProcessRunner`], spawns the program and
//! blocks until it exits; tests substitute a fake.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::builder::Script;
use crate::error::{Error, Result};

/// Ceiling on buffered stdout per invocation (50 MiB)
pub const DEFAULT_OUTPUT_LIMIT: u64 = 50 * 1024 * 1024;

/// A single program invocation: program name plus arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `osascript -e <script>`
    pub fn osascript(program: &str, script: &Script) -> Self {
        Self::new(program, vec!["-e".to_string(), script.render()])
    }

    /// `plutil -convert json -o - <path>`, printing the plist as JSON on stdout
    pub fn plist_to_json(program: &str, path: &Path) -> Self {
        Self::new(
            program,
            vec![
                "-convert".to_string(),
                "json".to_string(),
                "-o".to_string(),
                "-".to_string(),
                path.to_string_lossy().into_owned(),
            ],
        )
    }

    /// The AppleScript source, if this is an `-e` invocation
    pub fn script(&self) -> Option<&str> {
        match self.args.as_slice() {
            [flag, script, ..] if flag == "-e" => Some(script.as_str()),
            _ => None,
        }
    }
}

/// Runs an [`Invocation`] to completion and returns its trimmed stdout
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<String>;
}

/// [`CommandRunner`] that spawns real processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    output_limit: u64,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self {
            output_limit: DEFAULT_OUTPUT_LIMIT,
        }
    }

    pub fn with_output_limit(output_limit: u64) -> Self {
        Self { output_limit }
    }

    pub fn output_limit(&self) -> u64 {
        self.output_limit
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        debug!(program = %invocation.program, args = invocation.args.len(), "Spawning process");

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        // Drain stderr on its own thread so a full stderr pipe cannot stall
        // the child while we are blocked reading stdout.
        let stderr_pipe = child.stderr.take();
        let stderr_reader = std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut pipe) = stderr_pipe {
                let _ = pipe.read_to_end(&mut buf);
            }
            buf
        });

        let mut stdout = Vec::new();
        if let Some(pipe) = child.stdout.take() {
            pipe.take(self.output_limit.saturating_add(1))
                .read_to_end(&mut stdout)?;
        }

        if stdout.len() as u64 > self.output_limit {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::OutputTooLarge {
                program: invocation.program.clone(),
                limit: self.output_limit,
            });
        }

        let status = child.wait()?;
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).into_owned();
            debug!(program = %invocation.program, %status, "Process failed");
            return Err(Error::Failed {
                program: invocation.program.clone(),
                status: status.to_string(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}
