//! Minimal INI reader for Ceph configuration and keyring files.
//!
//! Ceph writes keyrings as `[client.<user>]` sections holding tab-indented
//! `key = value` pairs, and `ceph.conf` uses the same layout. Only the
//! features those files use are supported.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Name of the implicit section holding pairs that precede any header.
pub const DEFAULT_SECTION: &str = "";

#[derive(Debug, Error)]
pub enum IniError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// Parsed INI document: section name to key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    pub fn load(path: &Path) -> Result<Self, IniError> {
        let text = fs::read_to_string(path).map_err(|source| IniError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, IniError> {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current = DEFAULT_SECTION.to_string();

        for (idx, raw) in text.lines().enumerate() {
            let line_number = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') {
                if !line.ends_with(']') {
                    return Err(IniError::Syntax {
                        line: line_number,
                        message: format!("unterminated section header: {line}"),
                    });
                }
                let name = line[1..line.len() - 1].trim();
                if name.is_empty() {
                    return Err(IniError::Syntax {
                        line: line_number,
                        message: "empty section name".to_string(),
                    });
                }
                current = name.to_string();
                sections.entry(current.clone()).or_default();
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(IniError::Syntax {
                    line: line_number,
                    message: format!("invalid line format: {line}"),
                });
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(IniError::Syntax {
                    line: line_number,
                    message: "missing key before '='".to_string(),
                });
            }

            sections
                .entry(current.clone())
                .or_default()
                .insert(key.to_string(), unquote(value.trim()).to_string());
        }

        Ok(Self { sections })
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|pairs| pairs.get(key))
            .map(String::as_str)
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}
