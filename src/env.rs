//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, eliminating the need for
//! `unsafe` calls to [`std::env::set_var`] / [`std::env::remove_var`].

use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::ENV_HOME;

/// Environment variable reader.
///
/// Wraps lookups so that production code hits `std::env` while tests
/// can supply a controlled set of values.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    #[cfg(test)]
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Resolve the user's home directory: `$HOME` if set and non-empty,
    /// otherwise the platform lookup. Mock environments never fall through
    /// to the platform lookup.
    pub fn home_dir(&self) -> Option<PathBuf> {
        match self.var(ENV_HOME) {
            Ok(home) if !home.is_empty() => Some(PathBuf::from(home)),
            _ => match &self.overrides {
                None => dirs::home_dir(),
                Some(_) => None,
            },
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}
