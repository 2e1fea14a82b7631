//! Runtime settings and the file layout they imply.
//!
//! Settings are built once in `main` and passed by reference down the
//! pipeline. Path helpers live here so the environment check and the keyring
//! reader agree on where Ceph keeps its files.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::error::{ExportError, Result};

pub const DEFAULT_OUTPUT: &str = "~/rhcs-export";
pub const DEFAULT_CONF_DIR: &str = "/etc/ceph";
pub const DEFAULT_USER: &str = "admin";

/// Cluster CLI expected on `PATH`; also the prefix of per-user keyrings.
pub const CEPH_COMMAND: &str = "ceph";
pub const CEPH_CONF: &str = "ceph.conf";
const KEYRING_STORE_DIR: &str = "keyring-store";
const KEYRING_STORE_FILE: &str = "keyring";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output: String,
    pub conf_dir: PathBuf,
    pub format: OutputFormat,
    pub user: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT.to_string(),
            conf_dir: PathBuf::from(DEFAULT_CONF_DIR),
            format: OutputFormat::default(),
            user: DEFAULT_USER.to_string(),
        }
    }
}

impl Settings {
    pub fn ceph_conf_path(&self) -> PathBuf {
        self.conf_dir.join(CEPH_CONF)
    }

    /// `<confdir>/ceph.client.<user>.keyring`
    pub fn user_keyring_path(&self) -> PathBuf {
        self.conf_dir.join(keyring_file_name(&self.user))
    }

    /// `<confdir>/keyring-store/keyring`
    pub fn keyring_store_path(&self) -> PathBuf {
        self.conf_dir.join(KEYRING_STORE_DIR).join(KEYRING_STORE_FILE)
    }

    /// Section name holding the user's secret inside a keyring.
    pub fn keyring_section(&self) -> String {
        format!("client.{}", self.user)
    }

    /// Final artifact path: `<output>.<format>` with `~` expanded.
    pub fn output_path(&self) -> Result<PathBuf> {
        let base = expand_home(&self.output)?;
        let mut raw = base.into_os_string();
        raw.push(".");
        raw.push(self.format.extension());
        Ok(PathBuf::from(raw))
    }
}

pub fn keyring_file_name(user: &str) -> String {
    format!("{CEPH_COMMAND}.client.{user}.keyring")
}

/// Replace a leading `~` with the current user's home directory.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix('~') {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| ExportError::Output {
                message: format!("Unable to expand '~' in {path}"),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "home directory could not be determined",
                ),
            })?;
            Ok(join_home(&home, rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

fn join_home(home: &Path, rest: &str) -> PathBuf {
    let mut joined = home.as_os_str().to_os_string();
    joined.push(rest);
    PathBuf::from(joined)
}
