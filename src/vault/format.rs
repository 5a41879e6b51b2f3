//! On-disk layout of the credential store.
//!
//! The store is a single JSON document:
//!
//! ```text
//! { "version": 1, "next_id": 4, "credentials": [ { "id": 1, ... }, ... ] }
//! ```
//!
//! Passwords inside are envelope strings; nothing in the file is
//! plaintext-sensitive beyond site names and usernames.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::credential::Credential;
use crate::errors::{CredVaultError, Result};

/// Current store format version.
pub const CURRENT_VERSION: u8 = 1;

/// Serialized form of the whole store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreFile {
    pub version: u8,
    pub next_id: u64,
    pub credentials: Vec<Credential>,
}

/// Write the store to disk **atomically**.
///
/// Serializes to a temp file in the same directory, then renames it over
/// the target so readers never see a half-written file.
pub fn write_store(path: &Path, store: &StoreFile) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(store)
        .map_err(|e| CredVaultError::SerializationError(format!("store: {e}")))?;

    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let result = write_private(&tmp_path, &bytes).and_then(|()| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;
    Ok(())
}

/// Create `path` owner-only (0600 on Unix) from the first byte written.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // A stale temp file from a crashed run keeps its old mode otherwise.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(bytes)?;
    file.sync_all()
}

/// Read and validate a store file.
pub fn read_store(path: &Path) -> Result<StoreFile> {
    if !path.exists() {
        return Err(CredVaultError::StoreNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;
    let store: StoreFile = serde_json::from_slice(&data)
        .map_err(|e| CredVaultError::InvalidStoreFormat(format!("store JSON: {e}")))?;

    if store.version != CURRENT_VERSION {
        return Err(CredVaultError::InvalidStoreFormat(format!(
            "unsupported version {}, expected {CURRENT_VERSION}",
            store.version
        )));
    }

    if let Some(max_id) = store.credentials.iter().map(|c| c.id).max() {
        if max_id >= store.next_id {
            return Err(CredVaultError::InvalidStoreFormat(format!(
                "next_id {} is not above existing id {max_id}",
                store.next_id
            )));
        }
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty() -> StoreFile {
        StoreFile {
            version: CURRENT_VERSION,
            next_id: 1,
            credentials: Vec::new(),
        }
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        write_store(&path, &empty()).unwrap();

        let loaded = read_store(&path).unwrap();
        assert_eq!(loaded.next_id, 1);
        assert!(loaded.credentials.is_empty());
        assert!(!dir.path().join(".credentials.json.tmp").exists());
    }

    #[test]
    fn read_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_store(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(CredVaultError::StoreNotFound(_))));
    }

    #[test]
    fn read_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            read_store(&path),
            Err(CredVaultError::InvalidStoreFormat(_))
        ));
    }

    #[test]
    fn read_rejects_unknown_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{"version":9,"next_id":1,"credentials":[]}"#).unwrap();
        assert!(matches!(
            read_store(&path),
            Err(CredVaultError::InvalidStoreFormat(_))
        ));
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // Renaming a file over a non-empty directory fails.
        let target = dir.path().join("credentials.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        assert!(write_store(&target, &empty()).is_err());
        assert!(!dir.path().join(".credentials.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn stale_temp_file_is_narrowed_to_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        let tmp = dir.path().join(".credentials.json.tmp");
        fs::write(&tmp, "old").unwrap();
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o644)).unwrap();

        write_store(&path, &empty()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn store_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        write_store(&path, &empty()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
