//! Platform override file parsing.
//!
//! The platform override file is a flat `key=value` file letting a
//! deployment environment force-register implementations ahead of anything
//! discovered on the search path. Keys take the shape
//! `"<CapabilityTypeName>.<suffix>"`.

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed platform overrides.
///
/// Entries are held in a sorted map so per-capability iteration is
/// deterministic: lexicographic order of the literal key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformOverrides {
    entries: BTreeMap<String, String>,
}

impl PlatformOverrides {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `key=value` lines. Blank lines and lines starting with `#`
    /// (after leading whitespace) are skipped; any other line without `=`
    /// is malformed and aborts the parse.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::MalformedOverride {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    text: line.to_string(),
                });
            };
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Every `(key, value)` whose key is `"<capability>.<suffix>"`, in
    /// lexicographic key order.
    pub fn entries_for<'a>(
        &'a self,
        capability: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let prefix = format!("{capability}.");
        self.entries
            .iter()
            .filter(move |(k, _)| k.starts_with(&prefix) && k.len() > prefix.len())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
