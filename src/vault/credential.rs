//! Credential records as persisted and as returned to callers.
//!
//! A stored `Credential` only ever holds the envelope string in its
//! `password` field.  `CredentialView` is the decrypted form handed back
//! to the caller and is never written to disk.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::PasswordStrength;

/// A single credential record stored in the vault file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Store-assigned identifier, never reused.
    pub id: u64,

    /// The user this record belongs to.
    pub owner: String,

    pub site_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    pub username: String,

    /// Envelope string (`salt:nonce:tag:ciphertext`), opaque to the store.
    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for `CredentialStore::add`.
#[derive(Clone, Default)]
pub struct NewCredential {
    pub site_name: String,
    pub site_url: Option<String>,
    pub username: String,
    pub password: String,
    pub notes: Option<String>,
    pub category: Option<String>,
}

/// Partial update for `CredentialStore::update`.
///
/// `None` leaves a field untouched.  For the optional fields
/// (`site_url`, `notes`, `category`) an empty string clears the value.
#[derive(Clone, Default)]
pub struct CredentialUpdate {
    pub site_name: Option<String>,
    pub site_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

impl CredentialUpdate {
    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.site_name.is_none()
            && self.site_url.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.notes.is_none()
            && self.category.is_none()
    }
}

/// A credential with its password decrypted.
#[derive(Clone, Serialize)]
pub struct CredentialView {
    pub id: u64,
    pub site_name: String,
    pub site_url: Option<String>,
    pub username: String,
    pub password: String,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialView {
    /// Build a view from a stored record and its decrypted password.
    pub fn from_record(record: &Credential, password: String) -> Self {
        Self {
            id: record.id,
            site_name: record.site_name.clone(),
            site_url: record.site_url.clone(),
            username: record.username.clone(),
            password,
            notes: record.notes.clone(),
            category: record.category.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    pub fn strength(&self) -> PasswordStrength {
        PasswordStrength::of(&self.password)
    }
}

impl fmt::Debug for CredentialView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialView")
            .field("id", &self.id)
            .field("site_name", &self.site_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("site_name", &self.site_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for CredentialUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialUpdate")
            .field("site_name", &self.site_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

/// Turn an optional-field update into the stored value (`""` clears).
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
