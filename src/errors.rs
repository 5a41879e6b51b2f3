use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in CredVault.
#[derive(Debug, Error)]
pub enum CredVaultError {
    // --- Envelope / crypto errors ---
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Wrong secret and tampered data share one message.
    #[error("Unable to decrypt — wrong encryption key or corrupted data")]
    AuthenticationFailure,

    #[error("Random source failure: {0}")]
    RandomSourceFailure(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid charset: {0}")]
    InvalidCharset(String),

    // --- Store errors ---
    #[error("Credential store not found at {0}")]
    StoreNotFound(PathBuf),

    #[error("Credential store already exists at {0}")]
    StoreAlreadyExists(PathBuf),

    #[error("Invalid store format: {0}")]
    InvalidStoreFormat(String),

    #[error("Credential {0} not found")]
    CredentialNotFound(u64),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    // --- Keyring errors ---
    #[error("Keyring error: {0}")]
    KeyringError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for CredVault results.
pub type Result<T> = std::result::Result<T, CredVaultError>;
