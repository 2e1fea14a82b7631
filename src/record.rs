//! The exported record consumed by the import process.

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Connection facts for one Ceph cluster.
///
/// Field order and names are the file contract. URLs the cluster does not
/// advertise stay empty rather than being omitted so importers always see
/// every key.
pub struct ExportRecord {
    #[serde(default)]
    pub dashboard_url: String,
    pub fsid: String,
    pub secret: String,
    #[serde(default)]
    pub mgr: String,
    #[serde(default)]
    pub mgr_standby: Vec<String>,
    #[serde(default)]
    pub mons: Vec<String>,
    #[serde(default)]
    pub prometheus_url: String,
    #[serde(default)]
    pub rgws: Vec<String>,
    pub version: String,
}

impl ExportRecord {
    /// Fail unless the identifying fields are populated.
    pub fn ensure_complete(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("fsid", &self.fsid),
            ("secret", &self.secret),
            ("version", &self.version),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ExportError::Precondition(format!(
                "export record is missing {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_record_lists_missing_fields() {
        let record = ExportRecord {
            fsid: "abc".into(),
            ..ExportRecord::default()
        };
        let err = record.ensure_complete().unwrap_err();
        assert_eq!(err.to_string(), "export record is missing secret, version");
    }

    #[test]
    fn complete_record_passes() {
        let record = ExportRecord {
            fsid: "abc".into(),
            secret: "s".into(),
            version: "14.2.2".into(),
            ..ExportRecord::default()
        };
        assert!(record.ensure_complete().is_ok());
    }
}
