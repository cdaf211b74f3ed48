//! Key/value configuration parser with `[group]` sections.
//!
//! Parses files in the `param = value` format: full-line `#` comments,
//! `[group]` headers that scope every following pair until the next header,
//! values optionally wrapped in single or double quotes, and a configurable
//! separator token. Lines that match neither a header nor a key/value pair
//! are tolerated and skipped.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use super::ConfigError;
use crate::constants::DEFAULT_SEPARATOR;

/// Regex for group header lines, e.g. `[default]`.
static GROUP_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.+)\]$").unwrap());

/// A parsed configuration value: either a plain string or a one-level group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A plain string value.
    Scalar(String),
    /// A named group of key/value pairs, in insertion order.
    Group(IndexMap<String, String>),
}

impl Value {
    /// The scalar string, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Group(_) => None,
        }
    }

    /// The group mapping, if this value is one.
    pub fn as_group(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Value::Scalar(_) => None,
            Value::Group(map) => Some(map),
        }
    }
}

/// Parser for `key = value` configuration files with `[group]` sections.
///
/// Constructed either empty ([`KvConfig::new`]) or from a file
/// ([`KvConfig::load`]). The parsed store is read-only afterwards; the
/// [`add`](KvConfig::add) / [`add_to_group`](KvConfig::add_to_group)
/// primitives are exposed for callers that assemble a config by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct KvConfig {
    path: Option<PathBuf>,
    separator: String,
    params: IndexMap<String, Value>,
    groups: Vec<String>,
}

impl KvConfig {
    /// Create an empty parser with no backing file. Performs no I/O.
    pub fn new() -> Self {
        Self {
            path: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            params: IndexMap::new(),
            groups: Vec::new(),
        }
    }

    /// Parse the file at `path` with the default `=` separator.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with_separator(path, DEFAULT_SEPARATOR)
    }

    /// Parse the file at `path`, splitting key/value lines on `separator`.
    ///
    /// Fails with [`ConfigError::NotFound`] when the path does not exist and
    /// [`ConfigError::NotReadable`] when it exists but cannot be opened.
    /// Either the whole file parses or an error is returned; there is no
    /// partially constructed result.
    pub fn load_with_separator(
        path: impl AsRef<Path>,
        separator: &str,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = super::read_to_string(path)?;

        let mut config = Self {
            path: Some(path.to_path_buf()),
            separator: separator.to_string(),
            params: IndexMap::new(),
            groups: Vec::new(),
        };
        config.import(&content)?;
        Ok(config)
    }

    /// Import file contents into the store.
    ///
    /// One forward pass over the lines, carrying the current `[group]` scope
    /// across lines until the next header.
    fn import(&mut self, content: &str) -> Result<(), ConfigError> {
        // regex::escape guarantees the pattern is valid for any separator.
        let split_re = Regex::new(&format!(r"\s*{}\s*", regex::escape(&self.separator)))
            .expect("escaped separator pattern");

        let mut current_group: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();

            if line.starts_with('#') {
                continue;
            }

            // Header check precedes the separator check, so `[a=b]` opens a
            // group rather than splitting into a pair.
            if let Some(caps) = GROUP_HEADER_RE.captures(line) {
                let name = caps[1].to_string();
                self.add(&name, Value::Group(IndexMap::new()), false)?;
                current_group = Some(name);
                continue;
            }

            if split_re.is_match(line) {
                let mut parts = split_re.splitn(line, 2);
                let key = parts.next().unwrap_or("").trim().to_string();
                let value = unquote(parts.next().unwrap_or("").trim()).to_string();

                match &current_group {
                    Some(group) => self.add_to_group(group, &key, value)?,
                    None => self.add(&key, Value::Scalar(value), false)?,
                }
                continue;
            }

            // Blank or stray line: skipped, not an error.
        }

        Ok(())
    }

    /// Store a value under `name`.
    ///
    /// A group value merges key-by-key into an existing group (new keys
    /// overwrite same-named old keys), or replaces it wholesale when
    /// `override_existing` is set. A scalar value over an existing scalar
    /// overwrites it. Mixing shapes under one name is a
    /// [`ConfigError::TypeConflict`].
    pub fn add(
        &mut self,
        name: &str,
        value: Value,
        override_existing: bool,
    ) -> Result<(), ConfigError> {
        match value {
            Value::Group(incoming) => {
                match self.params.get_mut(name) {
                    Some(Value::Group(existing)) => {
                        if override_existing {
                            *existing = incoming;
                        } else {
                            existing.extend(incoming);
                        }
                    }
                    Some(Value::Scalar(_)) => {
                        return Err(ConfigError::TypeConflict {
                            name: name.to_string(),
                        });
                    }
                    None => {
                        self.params.insert(name.to_string(), Value::Group(incoming));
                    }
                }
                if !self.groups.iter().any(|g| g == name) {
                    self.groups.push(name.to_string());
                }
            }
            Value::Scalar(s) => {
                if matches!(self.params.get(name), Some(Value::Group(_))) {
                    return Err(ConfigError::TypeConflict {
                        name: name.to_string(),
                    });
                }
                self.params.insert(name.to_string(), Value::Scalar(s));
            }
        }
        Ok(())
    }

    /// Add a key/value pair to a named group, registering the group first if
    /// it does not exist yet. Re-setting an existing key overwrites it.
    pub fn add_to_group(
        &mut self,
        group: &str,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), ConfigError> {
        if !self.groups.iter().any(|g| g == group) {
            self.add(group, Value::Group(IndexMap::new()), false)?;
        }
        match self.params.get_mut(group) {
            Some(Value::Group(map)) => {
                map.insert(key.to_string(), value.into());
                Ok(())
            }
            _ => Err(ConfigError::TypeConflict {
                name: group.to_string(),
            }),
        }
    }

    /// Look up a top-level name. Returns `None` for unknown names.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// The nested mapping for `name`, if it is a group.
    pub fn group(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.params.get(name).and_then(Value::as_group)
    }

    /// All top-level names, scalars and groups alike.
    pub fn keys(&self) -> Vec<&str> {
        self.params.keys().map(String::as_str).collect()
    }

    /// Group names in the order they were first encountered.
    pub fn group_names(&self) -> &[String] {
        &self.groups
    }

    /// Iterate over all top-level entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The path this parser was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The separator token used when splitting key/value lines.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Legacy single-argument accessor.
    ///
    /// Behaves exactly like [`get`](KvConfig::get) but emits a `tracing`
    /// warning on every call.
    #[deprecated(note = "use `get` or `group` instead")]
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        warn!("get_value() is deprecated; use get() or group() instead");
        self.get(name)
    }
}

impl Default for KvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip one outer pair of matching quotes if the value is fully wrapped.
/// Interior quotes and unmatched quote characters are kept verbatim.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.conf");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn empty_parser_has_no_keys_or_groups() {
        let config = KvConfig::new();
        assert!(config.keys().is_empty());
        assert!(config.group_names().is_empty());
        assert!(config.path().is_none());
    }

    #[test]
    fn parses_top_level_scalars() {
        let (_dir, path) = write_config("region = us-east-1\n  padded   =   spaced out  \n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.get("region"), Some(&Value::Scalar("us-east-1".into())));
        assert_eq!(config.get("padded"), Some(&Value::Scalar("spaced out".into())));
    }

    #[test]
    fn splits_on_first_separator_only() {
        let (_dir, path) = write_config("connection = host=db port=5432\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(
            config.get("connection").unwrap().as_str(),
            Some("host=db port=5432")
        );
    }

    #[test]
    fn strips_matching_double_quotes() {
        let (_dir, path) = write_config("key = \"a=b\"\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.get("key").unwrap().as_str(), Some("a=b"));
    }

    #[test]
    fn strips_matching_single_quotes() {
        let (_dir, path) = write_config("secret = 'secret/value'\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.get("secret").unwrap().as_str(), Some("secret/value"));
    }

    #[test]
    fn keeps_interior_quotes_verbatim() {
        let (_dir, path) = write_config("quoted = \"say \"hi\" there\"\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(
            config.get("quoted").unwrap().as_str(),
            Some("say \"hi\" there")
        );
    }

    #[test]
    fn does_not_strip_unmatched_quotes() {
        let (_dir, path) = write_config("a = \"open\nb = it's\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.get("a").unwrap().as_str(), Some("\"open"));
        assert_eq!(config.get("b").unwrap().as_str(), Some("it's"));
    }

    #[test]
    fn empty_value_is_empty_string() {
        let (_dir, path) = write_config("empty =\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.get("empty").unwrap().as_str(), Some(""));
    }

    #[test]
    fn comment_lines_produce_no_entries() {
        let (_dir, path) = write_config("# key = value\n   # also = commented\nreal = 1\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.get("key"), None);
        assert_eq!(config.get("also"), None);
        assert_eq!(config.keys(), vec!["real"]);
    }

    #[test]
    fn blank_and_stray_lines_are_skipped() {
        let (_dir, path) = write_config("\n\njust some text\n\nkey = value\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.keys(), vec!["key"]);
    }

    #[test]
    fn groups_scope_following_pairs() {
        let (_dir, path) = write_config(
            "region = us-east-1\n\
             [default]\n\
             aws_access_key_id = AKIA_EXAMPLE\n\
             aws_secret_access_key = 'secret/value'\n",
        );
        let config = KvConfig::load(&path).unwrap();

        assert_eq!(config.get("region").unwrap().as_str(), Some("us-east-1"));
        assert_eq!(config.group_names(), ["default".to_string()]);

        let default = config.group("default").unwrap();
        assert_eq!(default["aws_access_key_id"], "AKIA_EXAMPLE");
        assert_eq!(default["aws_secret_access_key"], "secret/value");
    }

    #[test]
    fn repeated_group_headers_merge() {
        let (_dir, path) = write_config(
            "[db]\nhost = localhost\n\
             [web]\nport = 8080\n\
             [db]\nname = app\n",
        );
        let config = KvConfig::load(&path).unwrap();

        let db = config.group("db").unwrap();
        assert_eq!(db["host"], "localhost");
        assert_eq!(db["name"], "app");
        assert_eq!(config.group_names(), ["db".to_string(), "web".to_string()]);
    }

    #[test]
    fn last_write_wins_within_group() {
        let (_dir, path) = write_config("[db]\nhost = first\nhost = second\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.group("db").unwrap()["host"], "second");
    }

    #[test]
    fn last_write_wins_for_top_level_scalars() {
        let (_dir, path) = write_config("key = first\nkey = second\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.get("key").unwrap().as_str(), Some("second"));
    }

    #[test]
    fn group_header_over_scalar_is_a_type_conflict() {
        let (_dir, path) = write_config("db = scalar\n[db]\nhost = localhost\n");
        let err = KvConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TypeConflict { name } if name == "db"));
    }

    #[test]
    fn scalar_over_group_is_a_type_conflict() {
        let mut config = KvConfig::new();
        config
            .add("db", Value::Group(IndexMap::new()), false)
            .unwrap();
        let err = config
            .add("db", Value::Scalar("oops".into()), false)
            .unwrap_err();
        assert!(matches!(err, ConfigError::TypeConflict { name } if name == "db"));
    }

    #[test]
    fn add_override_replaces_group_wholesale() {
        let mut config = KvConfig::new();
        config.add_to_group("db", "host", "localhost").unwrap();
        config.add_to_group("db", "port", "5432").unwrap();

        let mut replacement = IndexMap::new();
        replacement.insert("name".to_string(), "app".to_string());
        config.add("db", Value::Group(replacement), true).unwrap();

        let db = config.group("db").unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db["name"], "app");
        // Still registered exactly once.
        assert_eq!(config.group_names(), ["db".to_string()]);
    }

    #[test]
    fn add_merge_overwrites_duplicate_keys() {
        let mut config = KvConfig::new();
        config.add_to_group("db", "host", "old").unwrap();

        let mut incoming = IndexMap::new();
        incoming.insert("host".to_string(), "new".to_string());
        incoming.insert("port".to_string(), "5432".to_string());
        config.add("db", Value::Group(incoming), false).unwrap();

        let db = config.group("db").unwrap();
        assert_eq!(db["host"], "new");
        assert_eq!(db["port"], "5432");
    }

    #[test]
    fn header_check_precedes_separator_check() {
        let (_dir, path) = write_config("[a=b]\nkey = value\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.group_names(), ["a=b".to_string()]);
        assert_eq!(config.group("a=b").unwrap()["key"], "value");
    }

    #[test]
    fn custom_separator() {
        let (_dir, path) = write_config("key : value\nurl : http://example.com:8080\n");
        let config = KvConfig::load_with_separator(&path, ":").unwrap();
        assert_eq!(config.get("key").unwrap().as_str(), Some("value"));
        // First occurrence only: the port colon stays in the value.
        assert_eq!(
            config.get("url").unwrap().as_str(),
            Some("http://example.com:8080")
        );
    }

    #[test]
    fn bom_on_first_line_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.conf");
        std::fs::write(&path, b"\xef\xbb\xbfregion = us-east-1\n").unwrap();

        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.get("region").unwrap().as_str(), Some("us-east-1"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = KvConfig::load(dir.path().join("absent.conf")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn keys_include_groups_and_scalars() {
        let (_dir, path) = write_config("top = 1\n[grp]\ninner = 2\n");
        let config = KvConfig::load(&path).unwrap();
        let keys = config.keys();
        assert!(keys.contains(&"top"));
        assert!(keys.contains(&"grp"));
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn get_missing_key_is_none() {
        let (_dir, path) = write_config("key = value\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn parsing_twice_yields_equal_stores() {
        let (_dir, path) = write_config("a = 1\n[g]\nb = 2\nc = 'three'\n");
        let first = KvConfig::load(&path).unwrap();
        let second = KvConfig::load(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    #[allow(deprecated)]
    fn deprecated_accessor_matches_get() {
        let (_dir, path) = write_config("key = value\n[grp]\na = b\n");
        let config = KvConfig::load(&path).unwrap();
        assert_eq!(config.get_value("key"), config.get("key"));
        assert_eq!(config.get_value("grp"), config.get("grp"));
        assert_eq!(config.get_value("missing"), None);
    }

    #[test]
    fn unquote_requires_two_characters() {
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("''"), "");
        assert_eq!(unquote("\"\""), "");
    }
}
