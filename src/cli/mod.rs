//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::settings::SECRET_ENV_VAR;
use crate::config::Settings;
use crate::crypto::EnvelopeCodec;
use crate::errors::{CredVaultError, Result};

/// CredVault CLI: personal credential vault.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Personal credential vault with encrypted passwords",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory (default: .credvault, or `store_dir` in .credvault.toml)
    #[arg(long, global = true)]
    pub store_dir: Option<String>,

    /// User whose credentials to operate on (default: `default_user` in .credvault.toml)
    #[arg(short, long, global = true, env = "CREDVAULT_USER")]
    pub user: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create an empty credential store
    Init,

    /// Add a credential
    Add {
        /// Site name (e.g. GitHub)
        site: String,
        /// Username or email for the site
        username: String,
        /// Site URL
        #[arg(long)]
        url: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Category (e.g. work, personal)
        #[arg(long)]
        category: Option<String>,
        /// Password (omit for stdin or interactive prompt)
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,
        /// Generate a random password instead of entering one
        #[arg(short, long)]
        generate: bool,
    },

    /// Show one credential with its password
    Get {
        /// Credential id
        id: u64,
        /// Print only the password (for scripts)
        #[arg(long)]
        password_only: bool,
        /// Copy the password to the clipboard instead of printing it
        #[arg(short, long, conflicts_with = "password_only")]
        copy: bool,
    },

    /// List all credentials
    List {
        /// Show passwords in the table
        #[arg(long)]
        show: bool,
    },

    /// Search credentials by site name or username
    Search {
        /// Case-insensitive search term
        term: String,
        /// Show passwords in the table
        #[arg(long)]
        show: bool,
    },

    /// Update fields of a credential (empty string clears url/notes/category)
    Update {
        /// Credential id
        id: u64,
        #[arg(long)]
        site: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// New password
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,
        /// Replace the password with a generated one
        #[arg(short, long)]
        generate: bool,
    },

    /// Delete a credential
    Delete {
        /// Credential id
        id: u64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    Generate {
        /// Number of characters (default: 16, or `password_length` in .credvault.toml)
        #[arg(short, long)]
        length: Option<usize>,
        /// Characters to draw from
        #[arg(short, long)]
        charset: Option<String>,
    },

    /// Rate a password as weak, medium or strong
    Strength {
        /// Password to rate (omit for stdin or interactive prompt)
        password: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },

    /// View the audit log of credential operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Manage the cached encryption key (OS keyring)
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

/// Auth subcommands for keyring management.
#[derive(clap::Subcommand)]
pub enum AuthAction {
    /// Save the encryption key to the OS keyring
    Keyring {
        /// Remove the key from the keyring instead of saving
        #[arg(long)]
        delete: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs to locate the store and act for a user.
pub struct Context {
    pub settings: Settings,
    pub store_dir: PathBuf,
    pub store_path: PathBuf,
    pub user: String,
}

impl Context {
    /// Resolve settings, store location and user from the CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let mut settings = Settings::load(&cwd)?;
        if let Some(ref dir) = cli.store_dir {
            settings.store_dir = dir.clone();
        }

        let user = cli
            .user
            .clone()
            .unwrap_or_else(|| settings.default_user.clone());
        validate_user_name(&user)?;

        Ok(Self {
            store_dir: settings.store_dir(&cwd),
            store_path: settings.store_path(&cwd),
            settings,
            user,
        })
    }

    /// Build the envelope codec from the resolved server secret.
    pub fn codec(&self) -> Result<EnvelopeCodec> {
        let secret = resolve_server_secret(Some(&self.store_path.to_string_lossy()))?;
        Ok(EnvelopeCodec::with_params(
            secret.as_str(),
            self.settings.kdf_params(),
        ))
    }

    /// Record an audit event (no-op without the `audit-log` feature).
    pub fn audit(&self, operation: &str, credential_id: Option<u64>, details: Option<&str>) {
        #[cfg(feature = "audit-log")]
        crate::audit::log_audit(&self.store_dir, &self.user, operation, credential_id, details);

        #[cfg(not(feature = "audit-log"))]
        let _ = (operation, credential_id, details);
    }
}

/// Get the server encryption secret, trying in order:
/// 1. `CREDVAULT_ENCRYPTION_KEY` env var
/// 2. OS keyring (if compiled with `keyring-store` feature)
/// 3. Interactive prompt
///
/// Returns `Zeroizing<String>` so the secret is wiped from memory on drop.
pub fn resolve_server_secret(store_id: Option<&str>) -> Result<Zeroizing<String>> {
    // 1. Environment (the usual way a server process receives it).
    if let Ok(secret) = std::env::var(SECRET_ENV_VAR) {
        if !secret.is_empty() {
            return Ok(Zeroizing::new(secret));
        }
    }

    // 2. Try the OS keyring.
    #[cfg(feature = "keyring-store")]
    if let Some(id) = store_id {
        match crate::keyring::get_secret(id) {
            Ok(Some(secret)) => return Ok(Zeroizing::new(secret)),
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "keyring unavailable"),
        }
    }

    #[cfg(not(feature = "keyring-store"))]
    let _ = store_id;

    // 3. Fall back to interactive prompt.
    if !io::stdin().is_terminal() {
        return Err(CredVaultError::ConfigError(format!(
            "no encryption key — set {SECRET_ENV_VAR}"
        )));
    }
    let secret = dialoguer::Password::new()
        .with_prompt("Enter encryption key")
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("key prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Read a credential password from piped stdin or a confirmed hidden prompt.
pub fn read_password_input(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']);
        return Ok(Zeroizing::new(trimmed.to_string()));
    }

    let password = dialoguer::Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match, try again")
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(password))
}

/// Validate that a user name is safe and sensible.
///
/// Allowed: ASCII letters, digits, `-`, `_`, `.` and `@`.
/// Must not be empty.  Max length 64 characters.
pub fn validate_user_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CredVaultError::ConfigError("user name cannot be empty".into()));
    }

    if name.len() > 64 {
        return Err(CredVaultError::ConfigError(
            "user name cannot exceed 64 characters".into(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
    {
        return Err(CredVaultError::ConfigError(format!(
            "user name '{name}' is invalid — only letters, digits, '-', '_', '.' and '@' are allowed"
        )));
    }

    Ok(())
}
