//! Save version lookup.
//!
//! The validator only needs a label to print and to know whether the version is one it recognizes;
//! what a version means for the save's contents is never interpreted.

use std::collections::BTreeMap;

use thiserror::Error;

/// What is known about a save version number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub label: String,
    pub known: bool,
}

pub trait VersionDescriptor {
    fn describe(&self, version: u32) -> VersionInfo;
}

/// Game releases and the save version they write.
const BUILTIN_VERSIONS: &[(u32, &str)] = &[
    (1107, "0.31.01"),
    (1205, "0.31.25"),
    (1254, "0.34.01"),
    (1287, "0.34.11"),
    (1372, "0.40.01"),
    (1404, "0.40.24"),
    (1441, "0.42.01"),
    (1479, "0.43.05"),
    (1534, "0.44.12"),
    (1623, "0.47.01"),
    (1710, "0.47.05"),
];

/// Version table: the built-in releases, optionally extended with user-supplied entries.
#[derive(Debug, Clone)]
pub struct SaveVersions {
    table: BTreeMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionTableError {
    #[error("line {line}: expected `<version> <label>`")]
    MissingLabel { line: usize },
    #[error("line {line}: `{text}` is not a save version number")]
    InvalidNumber { line: usize, text: String },
}

impl SaveVersions {
    pub fn builtin() -> Self {
        Self {
            table: BUILTIN_VERSIONS
                .iter()
                .map(|&(version, label)| (version, label.to_owned()))
                .collect(),
        }
    }

    /// Adds entries from a table with one `<version> <label>` pair per line. Blank lines and lines
    /// starting with `#` are skipped. Entries override existing ones with the same number.
    pub fn extend_from_table(&mut self, text: &str) -> Result<usize, VersionTableError> {
        let mut added = 0;
        for (i, line) in text.lines().enumerate() {
            let line_number = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((number, label)) = line.split_once(char::is_whitespace) else {
                return Err(VersionTableError::MissingLabel { line: line_number });
            };
            let label = label.trim();
            if label.is_empty() {
                return Err(VersionTableError::MissingLabel { line: line_number });
            }
            let version = number
                .parse::<u32>()
                .map_err(|_| VersionTableError::InvalidNumber {
                    line: line_number,
                    text: number.to_owned(),
                })?;
            self.table.insert(version, label.to_owned());
            added += 1;
        }
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for SaveVersions {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VersionDescriptor for SaveVersions {
    fn describe(&self, version: u32) -> VersionInfo {
        match self.table.get(&version) {
            Some(label) => VersionInfo {
                label: label.clone(),
                known: true,
            },
            None => VersionInfo {
                label: "unknown".to_owned(),
                known: false,
            },
        }
    }
}
