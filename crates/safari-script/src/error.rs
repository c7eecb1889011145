//! Error types for safari-script

/// Result type for safari-script operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while running an external automation command
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The program could not be started at all
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully
    #[error("{program} failed ({status})")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Standard output grew past the configured ceiling
    #[error("{program} produced more than {limit} bytes of output")]
    OutputTooLarge { program: String, limit: u64 },

    /// Standard I/O error while talking to the child process
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Human-readable diagnostic for this failure.
    ///
    /// Prefers whatever the program printed on stderr, since that is where
    /// `osascript` reports script errors such as "Safari got an error".
    pub fn diagnostic(&self) -> String {
        match self {
            Error::Failed { stderr, .. } if !stderr.trim().is_empty() => stderr.trim().to_string(),
            other => other.to_string(),
        }
    }
}
