//! Access to the operating system's CSPRNG.
//!
//! Salts, nonces and generated passwords all draw from `OsRng`.  The OS
//! generator is reentrant, so callers on any thread can use it without
//! locking.  Failures are returned, never papered over with a weaker source.

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{CredVaultError, Result};

/// Fill `buf` with cryptographically secure random bytes.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CredVaultError::RandomSourceFailure(e.to_string()))
}

/// Return a fixed-size array of random bytes.
pub fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut out = [0u8; N];
    fill_random(&mut out)?;
    Ok(out)
}

/// Draw a uniformly distributed random `u32`.
pub fn random_u32() -> Result<u32> {
    OsRng
        .try_next_u32()
        .map_err(|e| CredVaultError::RandomSourceFailure(e.to_string()))
}
