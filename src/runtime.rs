//! Executable lookup and command execution helpers.
//!
//! Centralizes PATH resolution and child-process handling so the cluster CLI
//! wrapper and the environment check agree on what "available" means.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{ExportError, Result};

/// Returns true when a file exists and has any execute bit set.
pub fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = std::fs::metadata(path) {
            return meta.permissions().mode() & 0o111 != 0;
        }
        false
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Find an executable by name somewhere on PATH.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    find_in_paths(name, env::var_os("PATH")?.as_os_str())
}

fn find_in_paths(name: &str, paths: &OsStr) -> Option<PathBuf> {
    env::split_paths(paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Run `program args...` and return its stdout.
///
/// Spawn failures and non-zero exits are both execution errors; stderr is
/// folded into the message so the operator sees what the CLI complained
/// about.
pub fn run_command(program: &str, args: &[&str]) -> Result<String> {
    let rendered = render(program, args);
    debug!(command = %rendered, "running command");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|err| ExportError::Execution(format!("error running '{rendered}': {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let code = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        return Err(ExportError::Execution(format!(
            "'{rendered}' exited with {code}: {}",
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|_| ExportError::Parse(format!("'{rendered}' produced non UTF-8 output")))
}

fn render(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
