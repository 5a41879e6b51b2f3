//! AES-256-GCM authenticated encryption with a 16-byte nonce.
//!
//! The stored envelope format fixes the nonce at 16 bytes rather than
//! GCM's usual 12, so the cipher is instantiated as `AesGcm<Aes256, U16>`.
//! The 16-byte tag is kept detached from the ciphertext, which has the
//! same length as the plaintext.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};

use super::kdf::KEY_LEN;
use super::random::random_array;
use crate::errors::{CredVaultError, Result};

/// Size of the nonce in bytes.
pub const NONCE_LEN: usize = 16;

/// Size of the authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// AES-256-GCM with a 128-bit nonce and 128-bit tag.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Encrypt `plaintext` under `key` and `nonce`.
///
/// Returns the ciphertext (same length as the plaintext) and the
/// detached authentication tag.
pub fn seal(
    plaintext: &[u8],
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<(Vec<u8>, [u8; TAG_LEN])> {
    let cipher = Aes256Gcm16::new_from_slice(key)
        .map_err(|e| CredVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(nonce), b"", &mut buffer)
        .map_err(|e| CredVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);
    Ok((buffer, tag_bytes))
}

/// Verify `tag` and decrypt `ciphertext`.
///
/// Any mismatch (wrong key, altered nonce, ciphertext or tag) fails with
/// `AuthenticationFailure` and no plaintext is returned.
pub fn open(
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>> {
    let cipher =
        Aes256Gcm16::new_from_slice(key).map_err(|_| CredVaultError::AuthenticationFailure)?;

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            Nonce::<U16>::from_slice(nonce),
            b"",
            &mut buffer,
            Tag::<U16>::from_slice(tag),
        )
        .map_err(|_| CredVaultError::AuthenticationFailure)?;

    Ok(buffer)
}

/// Generate a random 16-byte nonce.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    random_array()
}
