//! Parsing and gating of `ceph --version` output.

use crate::error::{ExportError, Result};

/// Length of the `ceph version ` banner that precedes the release number.
const VERSION_PREFIX_LEN: usize = 13;

/// Major release line the export format is defined for.
pub const SUPPORTED_RELEASE: &str = "14";
pub const SUPPORTED_RELEASE_NAME: &str = "Nautilus";

/// Extract the release number from `ceph --version` output.
///
/// `ceph version 14.2.8-59.el8cp (sha) nautilus (stable)` gives `14.2.8`.
pub fn parse_version(raw: &str) -> Result<String> {
    let rest = raw.get(VERSION_PREFIX_LEN..).ok_or_else(|| {
        ExportError::Parse(format!(
            "unexpected ceph version output: '{}'",
            raw.trim()
        ))
    })?;

    let version = rest
        .split('-')
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .next()
        .unwrap_or_default();

    if version.is_empty() {
        return Err(ExportError::Parse(format!(
            "no version number in ceph version output: '{}'",
            raw.trim()
        )));
    }
    Ok(version.to_string())
}

/// Reject releases outside the supported line.
pub fn ensure_supported(version: &str) -> Result<()> {
    if version.starts_with(SUPPORTED_RELEASE) {
        Ok(())
    } else {
        Err(ExportError::Compatibility(format!(
            "Export utility only supported on {SUPPORTED_RELEASE_NAME} clusters"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_at_first_hyphen() {
        assert_eq!(parse_version("ceph version 14.2.2-0-whatever").unwrap(), "14.2.2");
    }

    #[test]
    fn downstream_build_suffix_is_dropped() {
        let raw = "ceph version 14.2.8-59.el8cp (53387608e81e6aa2487c952a604db06faa5b2cd0) nautilus (stable)\n";
        assert_eq!(parse_version(raw).unwrap(), "14.2.8");
    }

    #[test]
    fn upstream_output_without_hyphen_stops_at_whitespace() {
        let raw = "ceph version 14.2.22 (ca74598065096e6fcbd8433c8779a2be0c889351) nautilus (stable)\n";
        assert_eq!(parse_version(raw).unwrap(), "14.2.22");
    }

    #[test]
    fn short_output_is_parse_error() {
        assert!(matches!(parse_version("ceph"), Err(ExportError::Parse(_))));
        assert!(matches!(
            parse_version("ceph version "),
            Err(ExportError::Parse(_))
        ));
    }

    #[test]
    fn only_nautilus_is_supported() {
        assert!(ensure_supported("14.2.2").is_ok());
        let err = ensure_supported("15.2.0").unwrap_err();
        assert!(matches!(err, ExportError::Compatibility(_)));
        assert_eq!(
            err.to_string(),
            "Export utility only supported on Nautilus clusters"
        );
        assert!(ensure_supported("12.2.13").is_err());
    }
}
