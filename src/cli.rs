//! Command-line definition for the `ceph-export` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::settings::{DEFAULT_CONF_DIR, DEFAULT_OUTPUT, DEFAULT_USER, OutputFormat, Settings};

#[derive(Debug, Parser)]
#[command(
    name = "ceph-export",
    version,
    about = "Export RHCS configuration information for an import process"
)]
pub struct Cli {
    /// Output file for the export; the format extension is appended.
    #[arg(short, long, env = "CEPH_EXPORT_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Ceph configuration directory.
    #[arg(short, long, env = "CEPH_EXPORT_CONFDIR", default_value = DEFAULT_CONF_DIR)]
    pub confdir: PathBuf,

    /// Output file format.
    #[arg(short, long, env = "CEPH_EXPORT_FORMAT", value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Ceph user whose keyring supplies the secret.
    #[arg(short, long, env = "CEPH_EXPORT_USER", default_value = DEFAULT_USER)]
    pub user: String,

    /// Increase log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            output: self.output.clone(),
            conf_dir: self.confdir.clone(),
            format: self.format,
            user: self.user.clone(),
        }
    }

    /// Default tracing directive when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};

    /// Parse flags only, ignoring any `CEPH_EXPORT_*` variables in the environment.
    fn parse_flags(args: &[&str]) -> Result<Cli, clap::Error> {
        let matches = Cli::command()
            .mut_args(|arg| arg.env(None::<&'static str>))
            .try_get_matches_from(args)?;
        Cli::from_arg_matches(&matches)
    }

    #[test]
    fn no_flags_yield_default_settings() {
        let cli = parse_flags(&["ceph-export"]).unwrap();
        assert_eq!(cli.settings(), Settings::default());
        assert_eq!(cli.log_directive(), "warn");
    }

    #[test]
    fn long_and_short_flags_override_defaults() {
        let cli = parse_flags(&[
            "ceph-export",
            "--output",
            "/tmp/out",
            "-c",
            "/opt/ceph",
            "--format",
            "yaml",
            "-u",
            "rgw",
            "-vv",
        ])
        .unwrap();
        let settings = cli.settings();
        assert_eq!(settings.output, "/tmp/out");
        assert_eq!(settings.conf_dir, PathBuf::from("/opt/ceph"));
        assert_eq!(settings.format, OutputFormat::Yaml);
        assert_eq!(settings.user, "rgw");
        assert_eq!(cli.log_directive(), "trace");
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(parse_flags(&["ceph-export", "--format", "toml"]).is_err());
    }
}
