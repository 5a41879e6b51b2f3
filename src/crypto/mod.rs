//! Cryptographic primitives for CredVault.
//!
//! This module provides:
//! - OS-backed randomness (`random`)
//! - PBKDF2-HMAC-SHA256 key derivation (`kdf`)
//! - AES-256-GCM sealing with a detached tag (`cipher`)
//! - The `salt:nonce:tag:ciphertext` envelope codec (`envelope`)
//! - Password generation and strength scoring (`password`)

pub mod cipher;
pub mod envelope;
pub mod kdf;
pub mod password;
pub mod random;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encode, decode, EnvelopeCodec, ...};
pub use cipher::{open, seal};
pub use envelope::{decode, encode, Envelope, EnvelopeCodec};
pub use kdf::{derive_key, derive_key_with_params, generate_salt, KdfParams};
pub use password::{generate, generate_default, PasswordStrength, DEFAULT_CHARSET};
