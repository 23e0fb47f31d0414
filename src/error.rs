//! Error type shared by the request validation and the compiler driver.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Result alias used across the crate.
pub type CompileResult<T> = Result<T, CompileError>;

/// Everything that can make an asset catalog compilation fail.
///
/// Every variant is terminal for the run; nothing is retried.
#[derive(thiserror::Error, Debug)]
pub enum CompileError {
    /// The output path does not name an `Assets.car` file.
    #[error("output should be path to compiled asset catalog, not to the containing bundle: {}", .path.display())]
    InvalidOutputName {
        /// Output path as given by the caller.
        path: PathBuf,
    },

    /// No input catalog was supplied.
    #[error("at least one input asset catalog is required")]
    NoInputs,

    /// Filesystem operation around the invocation failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The tool could not be started or waited on.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was launched.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `actool` exited with a failure status.
    #[error("actool failed with {status}")]
    ToolFailed {
        /// Exit status reported by the subprocess.
        status: ExitStatus,
        /// Complete output of the tool, path-corrected but otherwise unfiltered.
        output: String,
    },

    /// `actool` reported success but left warnings or errors behind.
    #[error("actool reported diagnostics")]
    Diagnostics {
        /// Filtered report, one section header followed by its lines.
        report: String,
    },
}

impl CompileError {
    /// Wrap an I/O error with a short description of the failed operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Text that must reach the error stream verbatim, for failures carrying tool output.
    pub fn diagnostic_text(&self) -> Option<&str> {
        match self {
            Self::ToolFailed { output, .. } => Some(output),
            Self::Diagnostics { report } => Some(report),
            _ => None,
        }
    }
}
