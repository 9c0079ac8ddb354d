//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: swarm error (bad dimensions, sampling failure at startup)
//! - 11: I/O error (config/timeline read, PNG or JSON write)
//! - 12: input error (unknown mode, shape, or palette; bad config JSON)
//! - 13: serialization error

use std::fmt;

use swarm_core::SwarmError;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    Swarm(SwarmError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Swarm(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Swarm(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<SwarmError> for CliError {
    fn from(e: SwarmError) -> Self {
        match e {
            SwarmError::Io(msg) => CliError::Io(msg),
            SwarmError::InvalidConfig(_)
            | SwarmError::UnknownMode(_)
            | SwarmError::UnknownShape(_)
            | SwarmError::InvalidColor(_)
            | SwarmError::InvalidPalette(_) => CliError::Input(e.to_string()),
            other => CliError::Swarm(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
