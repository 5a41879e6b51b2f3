//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The server secret is low-entropy, so every envelope stretches it with
//! a fresh 32-byte salt and 100 000 PBKDF2 rounds.  The output is a
//! 32-byte AES-256 key.

use hmac::Hmac;
use sha2::Sha256;

use super::random::random_array;
use crate::errors::{CredVaultError, Result};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Lowest iteration count accepted by `derive_key_with_params`.
const MIN_ITERATIONS: u32 = 1_000;

/// PBKDF2 work factor.
///
/// The envelope format does not record the iteration count, so all
/// envelopes in one store must be produced with the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of HMAC-SHA256 rounds (default: 100 000).
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Derive a 32-byte key from `secret` and `salt` with the default work factor.
///
/// An empty secret is valid input.
pub fn derive_key(secret: &[u8], salt: &[u8; SALT_LEN]) -> Result<[u8; KEY_LEN]> {
    derive_key_with_params(secret, salt, &KdfParams::default())
}

/// Derive a 32-byte key with an explicit work factor.
///
/// The same secret + salt + params always produce the same key.
pub fn derive_key_with_params(
    secret: &[u8],
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<[u8; KEY_LEN]> {
    if params.iterations < MIN_ITERATIONS {
        return Err(CredVaultError::KeyDerivationFailed(format!(
            "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
            params.iterations
        )));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(secret, salt, params.iterations, &mut key)
        .map_err(|e| CredVaultError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    random_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_salt() -> [u8; SALT_LEN] {
        let mut salt = [0u8; SALT_LEN];
        for (i, b) in salt.iter_mut().enumerate() {
            *b = i as u8;
        }
        salt
    }

    #[test]
    fn matches_known_answer() {
        let key = derive_key(b"server-secret", &fixed_salt()).unwrap();
        assert_eq!(
            hex::encode(key),
            "42d9fa7978866f5d29b2ad990f4f859f4b68764734c311ba3cfa1f6277c8b0c0"
        );
    }

    #[test]
    fn empty_secret_is_valid() {
        let key = derive_key(b"", &fixed_salt()).unwrap();
        assert_eq!(
            hex::encode(key),
            "558d0ef50fb0b917435bdf66547c5c1be4bdcef4e50bebfaac5385e56d254a45"
        );
    }

    #[test]
    fn rejects_weak_iteration_count() {
        let params = KdfParams { iterations: 10 };
        let result = derive_key_with_params(b"secret", &fixed_salt(), &params);
        assert!(matches!(
            result,
            Err(CredVaultError::KeyDerivationFailed(_))
        ));
    }

    #[test]
    fn iteration_count_changes_key() {
        let salt = fixed_salt();
        let fast = KdfParams { iterations: 1_000 };
        let slower = KdfParams { iterations: 2_000 };
        let a = derive_key_with_params(b"secret", &salt, &fast).unwrap();
        let b = derive_key_with_params(b"secret", &salt, &slower).unwrap();
        assert_ne!(a, b);
    }
}
