//! Cloud provider credential loaders.
//!
//! Thin projections over the configuration readers: each loader resolves a
//! well-known file under the home directory and maps fixed keys into a
//! provider-tagged record.

pub mod aws;
pub mod rackspace;

pub use aws::AwsCredentials;
pub use rackspace::RackspaceCredentials;

use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;

use crate::constants::{AWS_CREDENTIALS_FILE, RACKSPACE_CONFIG_FILE};
use crate::env::Env;
use crate::parser::ConfigError;

/// Errors from resolving and loading provider credentials.
#[derive(Error, Debug)]
pub enum CredentialsError {
    /// The credential file for `provider` does not exist.
    #[error("{provider} configuration file not found: {path}")]
    ConfigFileNotFound {
        provider: &'static str,
        path: PathBuf,
    },

    /// A well-known group is missing from the credential file.
    #[error("missing group [{group}] in {path}")]
    MissingGroup {
        group: &'static str,
        path: PathBuf,
    },

    /// A well-known key is missing from the credential file.
    #[error("missing key {key:?} in {path}")]
    MissingKey { key: &'static str, path: PathBuf },

    /// No home directory to resolve default credential paths against.
    #[error("cannot resolve credential paths: home directory not found")]
    HomeNotFound,

    /// The underlying file failed to read or parse.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Default locations of the provider credential files.
///
/// Replaces hidden per-loader path caches with one explicit struct: resolve
/// it from an [`Env`], or rely on the process-wide [`shared`] instance.
///
/// [`shared`]: CredentialPaths::shared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPaths {
    /// AWS shared credentials file (`~/.aws/credentials`).
    pub aws: PathBuf,
    /// Rackspace CLI config file (`~/.rack/config`).
    pub rackspace: PathBuf,
}

static SHARED_PATHS: OnceLock<CredentialPaths> = OnceLock::new();

impl CredentialPaths {
    /// Resolve both default paths under the home directory of `env`.
    pub fn resolve(env: &Env) -> Result<Self, CredentialsError> {
        let home = env.home_dir().ok_or(CredentialsError::HomeNotFound)?;
        Ok(Self {
            aws: home.join(AWS_CREDENTIALS_FILE),
            rackspace: home.join(RACKSPACE_CONFIG_FILE),
        })
    }

    /// The process-wide default paths, resolved from the real environment on
    /// first use and cached for the life of the process.
    pub fn shared() -> Result<&'static Self, CredentialsError> {
        if let Some(paths) = SHARED_PATHS.get() {
            return Ok(paths);
        }
        let resolved = Self::resolve(&Env::real())?;
        Ok(SHARED_PATHS.get_or_init(|| resolved))
    }

    /// Install `paths` as the process-wide default.
    ///
    /// One-shot: fails with the rejected value if the shared instance was
    /// already resolved or set.
    pub fn set_shared(paths: Self) -> Result<(), Self> {
        SHARED_PATHS.set(paths)
    }
}
