//! App-wide constants.
//!
//! Centralises the tool name, the default separator token, the well-known
//! credential file locations, and environment variable names.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "kvconf";

/// Default key/value separator token.
pub const DEFAULT_SEPARATOR: &str = "=";


// ── Credential file locations (relative to the home directory) ──────

/// AWS shared credentials file.
pub const AWS_CREDENTIALS_FILE: &str = ".aws/credentials";

/// Group holding the default AWS profile.
pub const AWS_DEFAULT_GROUP: &str = "default";

/// Rackspace CLI config file.
pub const RACKSPACE_CONFIG_FILE: &str = ".rack/config";


// ── Environment variable names ──────────────────────────────────────

/// Home directory variable used to resolve default credential paths.
pub const ENV_HOME: &str = "HOME";
