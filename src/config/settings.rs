use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, DEFAULT_ITERATIONS};
use crate::crypto::password::{DEFAULT_CHARSET, DEFAULT_LENGTH};
use crate::errors::{CredVaultError, Result};

/// Environment variable holding the server encryption secret.
pub const SECRET_ENV_VAR: &str = "CREDVAULT_ENCRYPTION_KEY";

/// Project-level configuration, loaded from `.credvault.toml`.
///
/// Every field has a sensible default so CredVault works out-of-the-box
/// without any config file at all.  The server secret is deliberately
/// not a setting: it never lives next to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the store and audit log.
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Owner used when `--user` is not given.
    #[serde(default = "default_user")]
    pub default_user: String,

    /// PBKDF2 iteration count (default: 100 000).
    ///
    /// Must match the value every existing envelope was written with.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Length of generated passwords (default: 16).
    #[serde(default = "default_password_length")]
    pub password_length: usize,

    /// Replacement charset for generated passwords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_charset: Option<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_store_dir() -> String {
    ".credvault".to_string()
}

fn default_user() -> String {
    "default".to_string()
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_password_length() -> usize {
    DEFAULT_LENGTH
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            default_user: default_user(),
            kdf_iterations: default_kdf_iterations(),
            password_length: default_password_length(),
            password_charset: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".credvault.toml";

    /// Name of the store file inside `store_dir`.
    const STORE_FILE: &'static str = "credentials.json";

    /// Load settings from `<project_dir>/.credvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CredVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.password_charset.as_deref() == Some("") {
            return Err(CredVaultError::ConfigError(
                "password_charset cannot be empty".into(),
            ));
        }

        Ok(settings)
    }

    /// Resolve the store directory against the project root.
    pub fn store_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.store_dir)
    }

    /// Full path of the credential store file.
    ///
    /// Example: `project_dir/.credvault/credentials.json`
    pub fn store_path(&self, project_dir: &Path) -> PathBuf {
        self.store_dir(project_dir).join(Self::STORE_FILE)
    }

    /// Convert the KDF setting into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            iterations: self.kdf_iterations,
        }
    }

    /// Charset used for generated passwords.
    pub fn charset(&self) -> &str {
        self.password_charset.as_deref().unwrap_or(DEFAULT_CHARSET)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
