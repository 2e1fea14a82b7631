//! JSON Schema gate for export records.
//!
//! The schema in `schema/export_record.json` is the contract the import
//! process reads against. It is embedded at build time so the binary carries
//! the exact copy it was tested with.

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::{ExportError, Result};
use crate::record::ExportRecord;

pub const EXPORT_RECORD_SCHEMA: &str = include_str!("../schema/export_record.json");

/// Validate a record's JSON form against the export schema.
///
/// Every violation is collected so the operator sees all of them at once.
pub fn validate_record(record: &ExportRecord) -> Result<()> {
    let instance = serde_json::to_value(record)
        .map_err(|err| ExportError::Serialization(format!("Export to json failed: {err}")))?;
    validate_value(&instance)
}

pub fn validate_value(instance: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(EXPORT_RECORD_SCHEMA).map_err(|err| {
        ExportError::Serialization(format!("embedded export schema is not JSON: {err}"))
    })?;
    let compiled = JSONSchema::compile(&schema).map_err(|err| {
        ExportError::Serialization(format!("compiling export schema failed: {err}"))
    })?;

    let violations: Vec<String> = match compiled.validate(instance) {
        Ok(()) => return Ok(()),
        Err(errors) => errors
            .map(|err| format!("{}: {err}", err.instance_path))
            .collect(),
    };

    Err(ExportError::Serialization(format!(
        "export record failed schema validation:\n{}",
        violations.join("\n")
    )))
}
