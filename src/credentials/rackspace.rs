//! Rackspace credential loader.
//!
//! Projects the flat keys of `~/.rack/config` into a fixed record.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use super::{CredentialPaths, CredentialsError};
use crate::parser::PropertiesReader;

/// Provider tag carried by Rackspace credential records.
pub const PROVIDER: &str = "Rackspace";

/// Credentials for the Rackspace CLI account.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RackspaceCredentials {
    /// Provider tag (always `"Rackspace"`).
    pub provider: &'static str,
    /// API key.
    pub api_key: String,
    /// Account username.
    pub username: String,
    /// Default region.
    pub region: String,
}

impl fmt::Debug for RackspaceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RackspaceCredentials")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("username", &self.username)
            .field("region", &self.region)
            .finish()
    }
}

impl RackspaceCredentials {
    /// Load from the process-wide default path (`~/.rack/config`).
    pub fn load() -> Result<Self, CredentialsError> {
        Self::load_from(&CredentialPaths::shared()?.rackspace)
    }

    /// Load from an explicit config file path.
    pub fn load_from(path: &Path) -> Result<Self, CredentialsError> {
        if !path.exists() {
            return Err(CredentialsError::ConfigFileNotFound {
                provider: PROVIDER,
                path: path.to_path_buf(),
            });
        }

        let props = PropertiesReader::load(path)?;
        Ok(Self {
            provider: PROVIDER,
            api_key: require(&props, "api-key")?,
            username: require(&props, "username")?,
            region: require(&props, "region")?,
        })
    }
}

/// Look up a required flat property.
fn require(props: &PropertiesReader, key: &'static str) -> Result<String, CredentialsError> {
    props
        .get(key)
        .map(str::to_string)
        .ok_or_else(|| CredentialsError::MissingKey {
            key,
            path: props.path().to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_flat_keys() {
        let (_dir, path) = write_config(
            "username: alice\n\
             api-key: 0123456789abcdef\n\
             region: DFW\n",
        );
        let creds = RackspaceCredentials::load_from(&path).unwrap();

        assert_eq!(creds.provider, "Rackspace");
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.api_key, "0123456789abcdef");
        assert_eq!(creds.region, "DFW");
    }

    #[test]
    fn missing_file_is_config_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = RackspaceCredentials::load_from(&dir.path().join("config")).unwrap_err();
        assert!(matches!(
            err,
            CredentialsError::ConfigFileNotFound { provider: "Rackspace", .. }
        ));
    }

    #[test]
    fn missing_key_is_an_error() {
        let (_dir, path) = write_config("username: alice\nregion: DFW\n");
        let err = RackspaceCredentials::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            CredentialsError::MissingKey { key: "api-key", .. }
        ));
    }

    #[test]
    fn debug_redacts_the_api_key() {
        let creds = RackspaceCredentials {
            provider: PROVIDER,
            api_key: "0123456789abcdef".into(),
            username: "alice".into(),
            region: "DFW".into(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("0123456789abcdef"));
        assert!(debug.contains("[REDACTED]"));
    }
}
