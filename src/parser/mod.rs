//! Configuration file parsing.
//!
//! Two readers share this module: [`KvConfig`] for `key = value` files with
//! `[group]` sections, and [`PropertiesReader`] for flat property files
//! without any section syntax.

pub mod kv;
pub mod props;

pub use kv::{KvConfig, Value};
pub use props::PropertiesReader;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from reading and parsing a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration path does not exist.
    #[error("configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// The path exists but cannot be opened for reading.
    #[error("configuration file {path} is not readable: {source}")]
    NotReadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Any other I/O failure while reading the file.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A name was reused with an incompatible value shape (scalar vs. group).
    #[error("{name} already exists, and is of a different type")]
    TypeConflict { name: String },
}

/// Read a configuration file to a string, distinguishing a missing path
/// from an unreadable one.
///
/// A leading UTF-8 byte-order mark is stripped, and other encoding oddities
/// are tolerated via lossy decoding; they never abort a parse.
pub(crate) fn read_to_string(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::IsADirectory => {
            ConfigError::NotReadable {
                path: path.to_path_buf(),
                source: e,
            }
        }
        std::io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(&bytes);
    Ok(String::from_utf8_lossy(bytes).into_owned())
}
