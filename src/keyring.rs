//! Reads a user's secret key out of a Ceph keyring.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::ini::IniDocument;
use crate::settings::Settings;

const KEY_ENTRY: &str = "key";

/// Keyring to read for the configured user, per-user file first.
pub fn locate_keyring(settings: &Settings) -> Option<PathBuf> {
    [settings.user_keyring_path(), settings.keyring_store_path()]
        .into_iter()
        .find(|candidate| candidate.is_file())
}

/// Return the `key` entry of `[client.<user>]`, or an empty string.
///
/// Every failure is soft: a missing or unparsable keyring, an absent section
/// or an absent key all come back as `""`. The caller decides whether an
/// empty credential is fatal.
pub fn fetch_key(settings: &Settings) -> String {
    let Some(path) = locate_keyring(settings) else {
        debug!("no keyring found for user {}", settings.user);
        return String::new();
    };
    debug!(keyring = %path.display(), "reading keyring");

    let doc = match IniDocument::load(&path) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(keyring = %path.display(), "unable to load keyring: {err}");
            return String::new();
        }
    };

    key_from_document(&doc, &settings.keyring_section())
}

fn key_from_document(doc: &IniDocument, section: &str) -> String {
    doc.get(section, KEY_ENTRY)
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings(dir: &TempDir, user: &str) -> Settings {
        Settings {
            conf_dir: dir.path().to_path_buf(),
            user: user.to_string(),
            ..Settings::default()
        }
    }

    fn write_store(dir: &TempDir, body: &str) {
        fs::create_dir_all(dir.path().join("keyring-store")).unwrap();
        fs::write(dir.path().join("keyring-store/keyring"), body).unwrap();
    }

    #[test]
    fn reads_key_for_requested_user() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ceph.client.x.keyring"),
            "[client.x]\n\tkey = SECRET\n\tcaps mon = \"allow *\"\n",
        )
        .unwrap();
        assert_eq!(fetch_key(&settings(&dir, "x")), "SECRET");
    }

    #[test]
    fn per_user_keyring_wins_over_store() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ceph.client.admin.keyring"),
            "[client.admin]\nkey = FROM_FILE\n",
        )
        .unwrap();
        write_store(&dir, "[client.admin]\nkey = FROM_STORE\n");
        assert_eq!(fetch_key(&settings(&dir, "admin")), "FROM_FILE");
    }

    #[test]
    fn falls_back_to_shared_store() {
        let dir = TempDir::new().unwrap();
        write_store(
            &dir,
            "[client.admin]\nkey = ADMIN\n[client.rgw]\nkey = RGW\n",
        );
        assert_eq!(fetch_key(&settings(&dir, "rgw")), "RGW");
    }

    #[test]
    fn missing_section_yields_empty() {
        let dir = TempDir::new().unwrap();
        write_store(&dir, "[client.admin]\nkey = ADMIN\n");
        assert_eq!(fetch_key(&settings(&dir, "other")), "");
    }

    #[test]
    fn missing_key_entry_yields_empty() {
        let dir = TempDir::new().unwrap();
        write_store(&dir, "[client.admin]\ncaps mon = \"allow *\"\n");
        assert_eq!(fetch_key(&settings(&dir, "admin")), "");
    }

    #[test]
    fn missing_file_yields_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(fetch_key(&settings(&dir, "admin")), "");
        assert!(locate_keyring(&settings(&dir, "admin")).is_none());
    }

    #[test]
    fn unparsable_file_yields_empty() {
        let dir = TempDir::new().unwrap();
        write_store(&dir, "garbage without structure\n");
        assert_eq!(fetch_key(&settings(&dir, "admin")), "");
    }
}
