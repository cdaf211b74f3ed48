//! AWS credential loader.
//!
//! Projects the `default` group of `~/.aws/credentials` into a fixed record.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use super::{CredentialPaths, CredentialsError};
use crate::constants::AWS_DEFAULT_GROUP;
use crate::parser::KvConfig;

/// Provider tag carried by AWS credential records.
pub const PROVIDER: &str = "AWS";

/// Credentials for the default AWS profile.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AwsCredentials {
    /// Provider tag (always `"AWS"`).
    pub provider: &'static str,
    /// Default region.
    pub region: String,
    /// Access key id.
    pub aws_access_key_id: String,
    /// Secret access key.
    pub aws_secret_access_key: String,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("provider", &self.provider)
            .field("region", &self.region)
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &"[REDACTED]")
            .finish()
    }
}

impl AwsCredentials {
    /// Load from the process-wide default path (`~/.aws/credentials`).
    pub fn load() -> Result<Self, CredentialsError> {
        Self::load_from(&CredentialPaths::shared()?.aws)
    }

    /// Load from an explicit credentials file path.
    pub fn load_from(path: &Path) -> Result<Self, CredentialsError> {
        if !path.exists() {
            return Err(CredentialsError::ConfigFileNotFound {
                provider: PROVIDER,
                path: path.to_path_buf(),
            });
        }

        let credentials = KvConfig::load(path)?;
        let profile =
            credentials
                .group(AWS_DEFAULT_GROUP)
                .ok_or_else(|| CredentialsError::MissingGroup {
                    group: AWS_DEFAULT_GROUP,
                    path: path.to_path_buf(),
                })?;

        Ok(Self {
            provider: PROVIDER,
            region: require(profile, "region", path)?,
            aws_access_key_id: require(profile, "aws_access_key_id", path)?,
            aws_secret_access_key: require(profile, "aws_secret_access_key", path)?,
        })
    }
}

/// Look up a required key in the profile group.
fn require(
    profile: &IndexMap<String, String>,
    key: &'static str,
    path: &Path,
) -> Result<String, CredentialsError> {
    profile
        .get(key)
        .cloned()
        .ok_or_else(|| CredentialsError::MissingKey {
            key,
            path: path.to_path_buf(),
        })
}
