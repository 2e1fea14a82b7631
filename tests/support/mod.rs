use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const NAUTILUS_VERSION: &str =
    "ceph version 14.2.8-59.el8cp (53387608e81e6aa2487c952a604db06faa5b2cd0) nautilus (stable)";

/// Scratch admin node: a config dir, a bin dir holding a fake `ceph`, and a
/// home directory for `~` expansion.
pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let root = TempDir::new().context("failed to allocate fixture dir")?;
        for sub in ["etc", "bin", "home"] {
            fs::create_dir(root.path().join(sub))?;
        }
        Ok(Self { root })
    }

    pub fn conf_dir(&self) -> PathBuf {
        self.root.path().join("etc")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    pub fn home_dir(&self) -> PathBuf {
        self.root.path().join("home")
    }

    pub fn write_conf(&self, fsid: &str) -> Result<()> {
        fs::write(
            self.conf_dir().join("ceph.conf"),
            format!("[global]\nfsid = {fsid}\nmon host = [v2:10.0.0.1:3300,v1:10.0.0.1:6789]\n"),
        )?;
        Ok(())
    }

    pub fn write_keyring(&self, user: &str, key: &str) -> Result<()> {
        fs::write(
            self.conf_dir().join(format!("ceph.client.{user}.keyring")),
            format!("[client.{user}]\n\tkey = {key}\n\tcaps mon = \"allow *\"\n"),
        )?;
        Ok(())
    }

    /// Install a fake `ceph` answering `-s -f json` and `--version`.
    pub fn install_ceph(&self, status: &serde_json::Value, version: &str) -> Result<()> {
        let status_path = self.root.path().join("status.json");
        fs::write(&status_path, serde_json::to_vec_pretty(status)?)?;
        let script = format!(
            "#!/bin/sh\ncase \"$1\" in\n  --version) echo '{version}' ;;\n  -s) cat '{}' ;;\n  *) exit 1 ;;\nesac\n",
            status_path.display()
        );
        let ceph = self.bin_dir().join("ceph");
        fs::write(&ceph, script)?;
        make_executable(&ceph)
    }

    /// Run the exporter with a PATH limited to the fixture plus system dirs.
    pub fn run(&self, args: &[&str]) -> Result<Output> {
        let path = format!("{}:/usr/bin:/bin", self.bin_dir().display());
        Command::new(env!("CARGO_BIN_EXE_ceph-export"))
            .args(args)
            .env("PATH", path)
            .env("HOME", self.home_dir())
            .env_remove("RUST_LOG")
            .env_remove("CEPH_EXPORT_OUTPUT")
            .env_remove("CEPH_EXPORT_CONFDIR")
            .env_remove("CEPH_EXPORT_FORMAT")
            .env_remove("CEPH_EXPORT_USER")
            .output()
            .context("failed to run ceph-export")
    }
}

pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}
