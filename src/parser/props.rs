//! Flat property file reader.
//!
//! Reads `key: value` / `key = value` files without any section syntax —
//! the format of the Rackspace CLI config. Values are stored verbatim after
//! trimming; unlike [`KvConfig`](super::KvConfig) there is no quote
//! stripping.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::ConfigError;

/// Reader for flat property files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesReader {
    path: PathBuf,
    props: IndexMap<String, String>,
}

impl PropertiesReader {
    /// Read and parse the property file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = super::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            props: parse(&content),
        })
    }

    /// Look up a property by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }

    /// All property keys, in file order.
    pub fn keys(&self) -> Vec<&str> {
        self.props.keys().map(String::as_str).collect()
    }

    /// The path this reader was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse property lines: trim, skip blanks and `#` comments, split each
/// remaining line on whichever of `:` or `=` occurs first.
fn parse(content: &str) -> IndexMap<String, String> {
    let mut props = IndexMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let split_at = match (line.find(':'), line.find('=')) {
            (Some(colon), Some(equals)) => colon.min(equals),
            (Some(colon), None) => colon,
            (None, Some(equals)) => equals,
            (None, None) => continue,
        };

        let key = line[..split_at].trim();
        let value = line[split_at + 1..].trim();
        props.insert(key.to_string(), value.to_string());
    }

    props
}
