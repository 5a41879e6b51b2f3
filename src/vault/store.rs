//! High-level credential operations used by CLI commands.
//!
//! `CredentialStore` keeps every user's records in one file and scopes
//! each operation to an owner: a record that belongs to someone else is
//! reported exactly like a missing one.  Passwords go through an
//! `EnvelopeCodec` on the way in and out; the store itself only ever
//! sees envelope strings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::crypto::EnvelopeCodec;
use crate::errors::{CredVaultError, Result};

use super::credential::{
    normalize_optional, Credential, CredentialUpdate, CredentialView, NewCredential,
};
use super::format::{self, StoreFile, CURRENT_VERSION};

/// Maximum length of owner names and text fields.
const MAX_FIELD_LEN: usize = 1024;

/// The credential store handle.  Create one with `CredentialStore::create`
/// or `CredentialStore::open`, then call `save` after mutating it.
pub struct CredentialStore {
    /// Path to the store file on disk.
    path: PathBuf,

    /// Next identifier to hand out.
    next_id: u64,

    /// Records keyed by id.
    credentials: BTreeMap<u64, Credential>,
}

impl CredentialStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new, empty store file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(CredVaultError::StoreAlreadyExists(path.to_path_buf()));
        }

        let mut store = Self {
            path: path.to_path_buf(),
            next_id: 1,
            credentials: BTreeMap::new(),
        };
        store.save()?;

        tracing::debug!(path = %path.display(), "created credential store");
        Ok(store)
    }

    /// Open an existing store file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = format::read_store(path)?;

        let credentials = file
            .credentials
            .into_iter()
            .map(|c| (c.id, c))
            .collect::<BTreeMap<_, _>>();

        tracing::debug!(
            path = %path.display(),
            records = credentials.len(),
            "opened credential store"
        );

        Ok(Self {
            path: path.to_path_buf(),
            next_id: file.next_id,
            credentials,
        })
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Encrypt and store a new credential for `owner`.
    ///
    /// Returns the stored record with the plaintext password echoed back
    /// once; the plaintext itself is never persisted.
    pub fn add(
        &mut self,
        owner: &str,
        new: NewCredential,
        codec: &EnvelopeCodec,
    ) -> Result<CredentialView> {
        validate_owner(owner)?;
        validate_required("site name", &new.site_name)?;
        validate_required("username", &new.username)?;
        validate_required("password", &new.password)?;
        for (name, value) in [
            ("site URL", &new.site_url),
            ("notes", &new.notes),
            ("category", &new.category),
        ] {
            if let Some(v) = value {
                validate_length(name, v)?;
            }
        }

        let envelope = codec.encode(&new.password)?;

        let id = self.next_id;
        self.next_id += 1;
        let now = Utc::now();

        let record = Credential {
            id,
            owner: owner.to_string(),
            site_name: new.site_name,
            site_url: normalize_optional(new.site_url),
            username: new.username,
            password: envelope,
            notes: normalize_optional(new.notes),
            category: normalize_optional(new.category),
            created_at: now,
            updated_at: now,
        };

        let view = CredentialView::from_record(&record, new.password);
        self.credentials.insert(id, record);

        tracing::debug!(id, "added credential");
        Ok(view)
    }

    /// Decrypt and return one credential owned by `owner`.
    pub fn get(&self, owner: &str, id: u64, codec: &EnvelopeCodec) -> Result<CredentialView> {
        let record = self.owned(owner, id)?;
        decrypt_record(record, codec)
    }

    /// Decrypt all of `owner`'s credentials, ordered by site name.
    pub fn list(&self, owner: &str, codec: &EnvelopeCodec) -> Result<Vec<CredentialView>> {
        self.collect_views(owner, codec, |_| true)
    }

    /// Case-insensitive substring search over site name and username.
    pub fn search(
        &self,
        owner: &str,
        term: &str,
        codec: &EnvelopeCodec,
    ) -> Result<Vec<CredentialView>> {
        let needle = term.to_lowercase();
        self.collect_views(owner, codec, |c| {
            c.site_name.to_lowercase().contains(&needle)
                || c.username.to_lowercase().contains(&needle)
        })
    }

    /// Apply a partial update to one of `owner`'s credentials.
    ///
    /// A new password is sealed into a wholly new envelope.
    pub fn update(
        &mut self,
        owner: &str,
        id: u64,
        update: CredentialUpdate,
        codec: &EnvelopeCodec,
    ) -> Result<CredentialView> {
        if update.is_empty() {
            return Err(CredVaultError::InvalidCredential(
                "no fields to update".into(),
            ));
        }
        if let Some(ref v) = update.site_name {
            validate_required("site name", v)?;
        }
        if let Some(ref v) = update.username {
            validate_required("username", v)?;
        }
        if let Some(ref v) = update.password {
            validate_required("password", v)?;
        }
        for (name, value) in [
            ("site URL", &update.site_url),
            ("notes", &update.notes),
            ("category", &update.category),
        ] {
            if let Some(v) = value {
                validate_length(name, v)?;
            }
        }

        // The current envelope must open under `codec` before anything
        // changes; a mistyped secret fails here with the record intact.
        let current = decrypt_record(self.owned(owner, id)?, codec)?;

        let (new_envelope, password) = match update.password {
            Some(pw) => (Some(codec.encode(&pw)?), pw),
            None => (None, current.password),
        };

        let record = self.owned_mut(owner, id)?;

        if let Some(v) = update.site_name {
            record.site_name = v;
        }
        if update.site_url.is_some() {
            record.site_url = normalize_optional(update.site_url);
        }
        if let Some(v) = update.username {
            record.username = v;
        }
        if let Some(envelope) = new_envelope {
            record.password = envelope;
        }
        if update.notes.is_some() {
            record.notes = normalize_optional(update.notes);
        }
        if update.category.is_some() {
            record.category = normalize_optional(update.category);
        }
        record.updated_at = Utc::now();

        tracing::debug!(id, "updated credential");
        Ok(CredentialView::from_record(record, password))
    }

    /// Remove one of `owner`'s credentials.
    pub fn delete(&mut self, owner: &str, id: u64) -> Result<()> {
        self.owned(owner, id)?;
        self.credentials.remove(&id);
        tracing::debug!(id, "deleted credential");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the store to disk atomically.
    pub fn save(&mut self) -> Result<()> {
        let file = StoreFile {
            version: CURRENT_VERSION,
            next_id: self.next_id,
            credentials: self.credentials.values().cloned().collect(),
        };
        format::write_store(&self.path, &file)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of credentials owned by `owner` (no decryption).
    pub fn count_for(&self, owner: &str) -> usize {
        self.credentials
            .values()
            .filter(|c| c.owner == owner)
            .count()
    }

    /// The raw stored record, envelope included.
    ///
    /// Metadata-only access; nothing is decrypted.
    pub fn record(&self, owner: &str, id: u64) -> Result<&Credential> {
        self.owned(owner, id)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn owned(&self, owner: &str, id: u64) -> Result<&Credential> {
        self.credentials
            .get(&id)
            .filter(|c| c.owner == owner)
            .ok_or(CredVaultError::CredentialNotFound(id))
    }

    fn owned_mut(&mut self, owner: &str, id: u64) -> Result<&mut Credential> {
        self.credentials
            .get_mut(&id)
            .filter(|c| c.owner == owner)
            .ok_or(CredVaultError::CredentialNotFound(id))
    }

    fn collect_views<F>(
        &self,
        owner: &str,
        codec: &EnvelopeCodec,
        predicate: F,
    ) -> Result<Vec<CredentialView>>
    where
        F: Fn(&Credential) -> bool,
    {
        let mut records: Vec<&Credential> = self
            .credentials
            .values()
            .filter(|c| c.owner == owner && predicate(*c))
            .collect();

        records.sort_by(|a, b| {
            a.site_name
                .to_lowercase()
                .cmp(&b.site_name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });

        records
            .into_iter()
            .map(|c| decrypt_record(c, codec))
            .collect()
    }
}

fn decrypt_record(record: &Credential, codec: &EnvelopeCodec) -> Result<CredentialView> {
    let password = codec.decode(&record.password).map_err(|e| {
        tracing::warn!(id = record.id, error = %e, "failed to decrypt credential");
        e
    })?;
    Ok(CredentialView::from_record(record, password))
}

fn validate_owner(owner: &str) -> Result<()> {
    if owner.trim().is_empty() {
        return Err(CredVaultError::InvalidCredential(
            "owner cannot be empty".into(),
        ));
    }
    validate_length("owner", owner)
}

fn validate_required(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CredVaultError::InvalidCredential(format!(
            "{name} is required"
        )));
    }
    validate_length(name, value)
}

fn validate_length(name: &str, value: &str) -> Result<()> {
    if value.len() > MAX_FIELD_LEN {
        return Err(CredVaultError::InvalidCredential(format!(
            "{name} cannot exceed {MAX_FIELD_LEN} bytes"
        )));
    }
    Ok(())
}
