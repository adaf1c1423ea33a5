use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::modules::error::ConfigError;

// Environment variable names
pub const DEBUG: &str = "DEBUG";
pub const KCIDB_SUBMIT_URL: &str = "KCIDB_SUBMIT_URL";
pub const KCIDB_TOKEN: &str = "KCIDB_TOKEN";
pub const KCIDB_STRICT_STATUS: &str = "KCIDB_STRICT_STATUS";

// Version file shipped next to the crate manifest
pub const DEFAULT_VERSION_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/kcidb.toml");

// Contents of the version file, e.g.
//
// [kcidb]
// major = 4
// minor = 3
#[derive(Debug, Deserialize)]
pub struct VersionFile {
    pub kcidb: SchemaVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

// Settings taken from the process environment
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    // Log reports instead of sending them
    pub debug: bool,
    // Where reports are POSTed; only required outside debug mode
    pub submit_url: Option<String>,
    // Bearer token for the submission endpoint
    pub token: Option<String>,
    // Treat non-2xx responses as failed submissions
    pub strict_status: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    // Build settings from any key lookup, so callers and tests don't
    // have to touch the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let debug = parse_flag(DEBUG, lookup(DEBUG))?;
        let strict_status = parse_flag(KCIDB_STRICT_STATUS, lookup(KCIDB_STRICT_STATUS))?;
        let submit_url = lookup(KCIDB_SUBMIT_URL).filter(|v| !v.is_empty());
        let token = lookup(KCIDB_TOKEN).filter(|v| !v.is_empty());

        let settings = Self {
            debug,
            submit_url,
            token,
            strict_status,
        };
        settings.check()?;
        Ok(settings)
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        self.endpoint().map(|_| ())
    }

    // URL and token for live delivery, None in debug mode.
    // Live submissions can't go anywhere without both.
    pub fn endpoint(&self) -> Result<Option<(&str, &str)>, ConfigError> {
        if self.debug {
            return Ok(None);
        }
        let url = self
            .submit_url
            .as_deref()
            .ok_or(ConfigError::MissingSetting(KCIDB_SUBMIT_URL))?;
        let token = self
            .token
            .as_deref()
            .ok_or(ConfigError::MissingSetting(KCIDB_TOKEN))?;
        Ok(Some((url, token)))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep the token out of logs
        f.debug_struct("Settings")
            .field("debug", &self.debug)
            .field("submit_url", &self.submit_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("strict_status", &self.strict_status)
            .finish()
    }
}

fn parse_flag(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidSetting { name, value }),
    }
}

pub fn load_version(path: impl AsRef<Path>) -> Result<SchemaVersion, ConfigError> {
    let path = path.as_ref();
    let io_error = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut file = File::open(path).map_err(io_error)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(io_error)?;

    let config: VersionFile = toml::from_str(&contents)?;
    Ok(config.kcidb)
}
