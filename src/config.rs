//! Runtime configuration read from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `GENRISK_MODEL_DIR` | `models` |
//! | `GENRISK_LOG_MODE` | `auto` (`file` \| `stdout`) |
//! | `GENRISK_LOG_FILE` | `genrisk.log` |
//! | `GENRISK_REQUIRE_SIGNED_ARTIFACTS` | `false` |
//! | `GENRISK_ARTIFACT_PUBKEY_B64` | unset |
//! | `GENRISK_ARTIFACT_PUBKEY_FILE` | unset |
//!
//! Log filtering itself is controlled by `RUST_LOG`.

use std::fs;
use std::path::PathBuf;

use crate::adapters::artifacts::verifying_key_from_b64;
use crate::adapters::IntegrityPolicy;
use crate::GenriskError;

pub const MODEL_DIR_ENV: &str = "GENRISK_MODEL_DIR";
pub const LOG_MODE_ENV: &str = "GENRISK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "GENRISK_LOG_FILE";
pub const REQUIRE_SIGNED_ENV: &str = "GENRISK_REQUIRE_SIGNED_ARTIFACTS";
pub const PUBKEY_B64_ENV: &str = "GENRISK_ARTIFACT_PUBKEY_B64";
pub const PUBKEY_FILE_ENV: &str = "GENRISK_ARTIFACT_PUBKEY_FILE";

const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_LOG_FILE: &str = "genrisk.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Whether logs should go to the log file.
    ///
    /// Writing logs to the terminal corrupts the TUI alternate screen, so
    /// `Auto` picks the file whenever stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub require_signed: bool,
    pub pubkey_b64: Option<String>,
    pub pubkey_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            require_signed: false,
            pubkey_b64: None,
            pubkey_file: None,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            model_dir: non_empty(MODEL_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            log_mode: non_empty(LOG_MODE_ENV)
                .map(|v| LogMode::parse(&v))
                .unwrap_or_default(),
            log_file: non_empty(LOG_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            require_signed: non_empty(REQUIRE_SIGNED_ENV)
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            pubkey_b64: non_empty(PUBKEY_B64_ENV),
            pubkey_file: non_empty(PUBKEY_FILE_ENV).map(|v| PathBuf::from(v.trim())),
        }
    }

    /// Build the artifact integrity policy, loading the verifying key if one
    /// is configured. The key file takes precedence over the inline key.
    ///
    /// # Errors
    /// Returns error if the key file cannot be read or the key is malformed.
    pub fn integrity_policy(&self) -> Result<IntegrityPolicy, GenriskError> {
        let b64 = match (&self.pubkey_file, &self.pubkey_b64) {
            (Some(path), _) => Some(fs::read_to_string(path).map_err(|e| {
                GenriskError::Config(format!("Failed reading {}: {e}", path.display()))
            })?),
            (None, Some(b64)) => Some(b64.clone()),
            (None, None) => None,
        };

        let verifying_key = b64.as_deref().map(verifying_key_from_b64).transpose()?;

        Ok(IntegrityPolicy {
            require_signed: self.require_signed,
            verifying_key,
        })
    }
}
