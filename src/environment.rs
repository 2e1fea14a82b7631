//! Pre-flight checks run before anything touches the cluster.

use tracing::{debug, warn};

use crate::cluster::ClusterCli;
use crate::error::{ExportError, Result};
use crate::ini::IniDocument;
use crate::settings::Settings;

/// Confirm the admin node can run an export.
///
/// Checks run in order and the first failure wins.
pub fn check_environment(settings: &Settings, cli: &dyn ClusterCli) -> Result<()> {
    let conf_dir = &settings.conf_dir;
    debug!(dir = %conf_dir.display(), "checking configuration directory");
    if !conf_dir.is_dir() {
        return Err(ExportError::Environment(format!(
            "Directory '{}' not found",
            conf_dir.display()
        )));
    }

    let conf_path = settings.ceph_conf_path();
    if !conf_path.is_file() {
        return Err(ExportError::Environment(format!(
            "ceph configuration file missing from {}",
            conf_dir.display()
        )));
    }

    let user_keyring = settings.user_keyring_path();
    let keyring_store = settings.keyring_store_path();
    debug!(
        user_keyring = %user_keyring.display(),
        keyring_store = %keyring_store.display(),
        "checking keyrings"
    );
    if !user_keyring.is_file() && !keyring_store.is_file() {
        return Err(ExportError::Environment(
            "missing keyring/keyring store".to_string(),
        ));
    }

    if !cli.is_available() {
        return Err(ExportError::Environment(
            "ceph command is unavailable".to_string(),
        ));
    }

    Ok(())
}

/// Parse `ceph.conf` for cross-checks; an unreadable file is only logged.
pub fn read_ceph_conf(settings: &Settings) -> Option<IniDocument> {
    let conf_path = settings.ceph_conf_path();
    match IniDocument::load(&conf_path) {
        Ok(doc) => Some(doc),
        Err(err) => {
            warn!(conf = %conf_path.display(), "ignoring unparsable ceph.conf: {err}");
            None
        }
    }
}
