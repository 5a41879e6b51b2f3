//! Random password generation and a simple strength classifier.
//!
//! Characters are drawn from the OS CSPRNG.  Each position picks an index
//! into the charset by rejection sampling over 32-bit draws, so every
//! character is equally likely regardless of the charset size.

use std::fmt;

use super::random::random_u32;
use crate::errors::{CredVaultError, Result};

/// Lowercase, uppercase, digits and 18 symbols: 80 characters,
/// about 6.32 bits of entropy per generated character.
pub const DEFAULT_CHARSET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+-=[]{}";

/// Default generated password length (~101 bits with the default charset).
pub const DEFAULT_LENGTH: usize = 16;

/// Generate a password of exactly `length` characters drawn uniformly
/// from `charset`.
///
/// The charset is used as given; a repeated character is proportionally
/// more likely.  No upper bound is placed on `length`.
pub fn generate(length: usize, charset: &str) -> Result<String> {
    let alphabet: Vec<char> = charset.chars().collect();
    if alphabet.is_empty() {
        return Err(CredVaultError::InvalidCharset(
            "charset must contain at least one character".into(),
        ));
    }
    let size = u32::try_from(alphabet.len()).map_err(|_| {
        CredVaultError::InvalidCharset(format!(
            "charset of {} characters is too large",
            alphabet.len()
        ))
    })?;

    let mut password = String::with_capacity(length);
    for _ in 0..length {
        password.push(alphabet[uniform_index(size)? as usize]);
    }
    Ok(password)
}

/// Generate a password with `DEFAULT_LENGTH` and `DEFAULT_CHARSET`.
pub fn generate_default() -> Result<String> {
    generate(DEFAULT_LENGTH, DEFAULT_CHARSET)
}

/// Uniform integer in `0..size`.  `size` must be non-zero.
fn uniform_index(size: u32) -> Result<u32> {
    // Largest multiple of `size` that fits in u32; draws at or above it
    // would bias the low indices.
    let zone = u32::MAX - (u32::MAX % size);
    loop {
        let draw = random_u32()?;
        if draw < zone {
            return Ok(draw % size);
        }
    }
}

/// Coarse password strength, as shown next to each credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    /// Classify by length and by how many character classes appear
    /// (lowercase, uppercase, digit, other).
    ///
    /// Length is counted in UTF-16 code units, the way the web UI counts
    /// it, so a character outside the BMP counts twice.
    pub fn of(password: &str) -> Self {
        let classes = [
            password.chars().any(|c| c.is_ascii_lowercase()),
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ];
        let score = classes.iter().filter(|&&present| present).count();
        let length = password.encode_utf16().count();

        if length >= 12 && score >= 3 {
            Self::Strong
        } else if length >= 8 && score >= 2 {
            Self::Medium
        } else {
            Self::Weak
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        };
        f.write_str(label)
    }
}
