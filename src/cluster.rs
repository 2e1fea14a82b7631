//! Access to the running cluster through its command-line client.

use crate::error::Result;
use crate::runtime::{find_on_path, run_command};
use crate::settings::CEPH_COMMAND;

/// The three interactions the exporter has with the cluster CLI.
pub trait ClusterCli {
    /// Whether the CLI can be invoked at all.
    fn is_available(&self) -> bool;

    /// Raw output of `ceph -s -f json`.
    fn status_json(&self) -> Result<String>;

    /// Raw output of `ceph --version`.
    fn version(&self) -> Result<String>;
}

/// `ceph` found on `PATH`.
#[derive(Debug, Clone)]
pub struct SystemCli {
    program: String,
}

impl SystemCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemCli {
    fn default() -> Self {
        Self::new(CEPH_COMMAND)
    }
}

impl ClusterCli for SystemCli {
    fn is_available(&self) -> bool {
        find_on_path(&self.program).is_some()
    }

    fn status_json(&self) -> Result<String> {
        run_command(&self.program, &["-s", "-f", "json"])
    }

    fn version(&self) -> Result<String> {
        run_command(&self.program, &["--version"])
    }
}
