//! The export run: validate, read credentials, collect, write.
//!
//! Progress lines go to the supplied writer (stdout in the binary); log
//! events go through `tracing`. Any stage failure is returned as-is and the
//! remaining stages are skipped.

use std::io::Write;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::cluster::ClusterCli;
use crate::environment::{check_environment, read_ceph_conf};
use crate::error::{ExportError, Result};
use crate::export::export_record;
use crate::ini::IniDocument;
use crate::keyring::fetch_key;
use crate::record::ExportRecord;
use crate::settings::Settings;
use crate::status::{ClusterFacts, HostResolver, map_status, parse_status};
use crate::version::{ensure_supported, parse_version};

/// Collaborators the pipeline talks to.
pub struct Context<'a> {
    pub cli: &'a dyn ClusterCli,
    pub resolver: &'a dyn HostResolver,
}

/// Run every stage and write the export file.
pub fn run(settings: &Settings, ctx: &Context<'_>, out: &mut dyn Write) -> Result<PathBuf> {
    let record = collect(settings, ctx, out)?;
    let path = export_record(&record, settings)?;
    // Export is on disk; the confirmation line is best effort.
    if let Err(err) = say(out, &format!("\nMetadata written to {}\n", path.display())) {
        warn!(path = %path.display(), "export written but confirmation could not be printed: {err}");
    }
    Ok(path)
}

/// Everything up to, but not including, writing the file.
pub fn collect(settings: &Settings, ctx: &Context<'_>, out: &mut dyn Write) -> Result<ExportRecord> {
    say(out, "\nChecking environment......")?;
    if let Err(err) = check_environment(settings, ctx.cli) {
        say(out, "FAILED\n")?;
        return Err(err);
    }
    say(out, "PASSED\n")?;
    let ceph_conf = read_ceph_conf(settings);

    let secret = fetch_key(settings);
    if secret.is_empty() {
        return Err(ExportError::Credential(format!(
            "Unable to load a key for the '{}' user",
            settings.user
        )));
    }

    say(out, "Querying ceph state.......")?;
    let status = match ctx.cli.status_json() {
        Ok(raw) => {
            say(out, "OK\n")?;
            raw
        }
        Err(err) => {
            say(out, "FAILED\n")?;
            return Err(ExportError::Execution(format!(
                "Unable to gather status from ceph with 'ceph -s' command: {err}"
            )));
        }
    };
    let status = parse_status(&status)?;

    say(out, "Checking ceph version.....")?;
    let version = match ctx.cli.version().and_then(|raw| parse_version(&raw)) {
        Ok(version) => version,
        Err(err) => {
            say(out, "FAILED\n")?;
            return Err(err);
        }
    };
    if let Err(err) = ensure_supported(&version) {
        say(out, "FAILED\n")?;
        return Err(err);
    }
    say(out, "PASSED\n")?;
    info!(version = %version, "cluster version accepted");

    let facts = map_status(&status, ctx.resolver)?;
    facts.ensure_metrics_enabled()?;
    say(out, "Active mgr module check...PASSED\n")?;

    if let Some(conf) = &ceph_conf {
        warn_on_fsid_mismatch(conf, &facts);
    }
    Ok(facts.into_record(secret, version))
}

fn warn_on_fsid_mismatch(ceph_conf: &IniDocument, facts: &ClusterFacts) {
    if let Some(conf_fsid) = ceph_conf.get("global", "fsid") {
        if conf_fsid != facts.fsid {
            warn!(
                conf_fsid,
                status_fsid = %facts.fsid,
                "ceph.conf fsid differs from cluster status; exporting the status value"
            );
        }
    }
}

fn say(out: &mut dyn Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|source| ExportError::Output {
            message: "Unable to write progress output".to_string(),
            source,
        })
}
