//! Encoding and writing of the export file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::error::{ExportError, Result};
use crate::record::ExportRecord;
use crate::schema::validate_record;
use crate::settings::{OutputFormat, Settings};

const JSON_INDENT: &[u8] = b"    ";
const YAML_DOCUMENT_START: &str = "---\n";

/// Pretty JSON with four-space indentation.
pub fn to_json(record: &ExportRecord) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(JSON_INDENT));
    record
        .serialize(&mut serializer)
        .map_err(|err| ExportError::Serialization(format!("Export to json failed: {err}")))?;
    Ok(out)
}

/// YAML preceded by an explicit document-start marker.
pub fn to_yaml(record: &ExportRecord) -> Result<Vec<u8>> {
    let body = serde_yaml::to_string(record)
        .map_err(|err| ExportError::Serialization(format!("Export to yaml failed: {err}")))?;
    let mut out = String::with_capacity(YAML_DOCUMENT_START.len() + body.len());
    out.push_str(YAML_DOCUMENT_START);
    out.push_str(&body);
    Ok(out.into_bytes())
}

pub fn encode(record: &ExportRecord, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => to_json(record),
        OutputFormat::Yaml => to_yaml(record),
    }
}

/// Validate, encode and write the record; returns the path written.
pub fn export_record(record: &ExportRecord, settings: &Settings) -> Result<PathBuf> {
    record.ensure_complete()?;
    validate_record(record)?;
    let payload = encode(record, settings.format)?;
    let path = settings.output_path()?;
    write_file(&path, &payload)?;
    info!(path = %path.display(), format = %settings.format, "export written");
    Ok(path)
}

fn write_file(path: &Path, payload: &[u8]) -> Result<()> {
    fs::write(path, payload).map_err(|source| ExportError::Output {
        message: format!("Failed to write the file {}", path.display()),
        source,
    })
}
