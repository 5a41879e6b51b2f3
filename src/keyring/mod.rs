//! OS keyring integration for the server secret.
//!
//! Caches the encryption secret in the operating system's credential
//! store (macOS Keychain, Windows Credential Manager, Linux Secret
//! Service), keyed by the store path.
//!
//! All operations fail gracefully. If the keyring is unavailable, the
//! error is returned and the caller falls back to a prompt.

use crate::errors::{CredVaultError, Result};

/// Service name used in the OS keyring.
const SERVICE_NAME: &str = "credvault";

fn entry(store_path: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(SERVICE_NAME, &format!("store:{store_path}")).map_err(|e| {
        CredVaultError::KeyringError(format!("failed to create keyring entry: {e}"))
    })
}

/// Store the server secret for a specific credential store.
pub fn store_secret(store_path: &str, secret: &str) -> Result<()> {
    entry(store_path)?.set_password(secret).map_err(|e| {
        CredVaultError::KeyringError(format!("failed to store secret in keyring: {e}"))
    })
}

/// Retrieve the server secret for a specific credential store.
///
/// Returns `None` if nothing is stored (rather than an error).
pub fn get_secret(store_path: &str) -> Result<Option<String>> {
    match entry(store_path)?.get_password() {
        Ok(secret) => Ok(Some(secret)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(CredVaultError::KeyringError(format!(
            "failed to read from keyring: {e}"
        ))),
    }
}

/// Delete the stored server secret.
pub fn delete_secret(store_path: &str) -> Result<()> {
    match entry(store_path)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(CredVaultError::KeyringError(format!(
            "failed to delete from keyring: {e}"
        ))),
    }
}
