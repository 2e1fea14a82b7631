//! Error taxonomy for the export pipeline.
//!
//! Every variant is fatal. Stages return these to the caller and only the
//! binary turns one into a printed message and an exit status.

use thiserror::Error;

/// Exit status used for every fatal condition.
pub const EXIT_FAILURE_CODE: i32 = 4;

/// Failure raised by one of the pipeline stages.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration directory, config file, keyring or CLI missing.
    #[error("{0}")]
    Environment(String),

    /// The keyring produced no usable secret.
    #[error("{0}")]
    Credential(String),

    /// An external command could not be spawned or exited non-zero.
    #[error("{0}")]
    Execution(String),

    /// Command output could not be decoded.
    #[error("{0}")]
    Parse(String),

    /// The cluster runs a release this tool does not support.
    #[error("{0}")]
    Compatibility(String),

    /// The status tree does not have the expected shape.
    #[error("unexpected status layout at '{path}': expected {expected}, found {found}")]
    Schema {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A cluster-side prerequisite is not satisfied.
    #[error("{0}")]
    Precondition(String),

    /// The record could not be encoded or failed validation.
    #[error("{0}")]
    Serialization(String),

    /// The export file could not be written.
    #[error("{message}: {source}")]
    Output {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn schema(path: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::Schema {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Short label for the error category, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Environment(_) => "environment",
            Self::Credential(_) => "credential",
            Self::Execution(_) => "execution",
            Self::Parse(_) => "parse",
            Self::Compatibility(_) => "compatibility",
            Self::Schema { .. } => "schema",
            Self::Precondition(_) => "precondition",
            Self::Serialization(_) => "serialization",
            Self::Output { .. } => "output",
        }
    }
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;
