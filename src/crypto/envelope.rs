//! Envelope encryption for stored secrets.
//!
//! Every call to `encode` draws a fresh salt and nonce, derives a key from
//! the server secret, seals the plaintext and packs the four fields into
//! one string:
//!
//! ```text
//! <salt_hex>:<nonce_hex>:<tag_hex>:<ciphertext_hex>
//!   32 bytes  16 bytes    16 bytes  len(plaintext) bytes
//! ```
//!
//! Hex is written lowercase.  The string is opaque to the storage layer.

use std::fmt;
use std::str::FromStr;

use zeroize::{Zeroize, Zeroizing};

use super::cipher::{self, NONCE_LEN, TAG_LEN};
use super::kdf::{self, KdfParams, SALT_LEN};
use crate::errors::{CredVaultError, Result};

/// Separator between the four hex fields.
pub const DELIMITER: char = ':';

/// Number of fields in a serialized envelope.
const FIELD_COUNT: usize = 4;

/// The parsed form of a stored secret.
///
/// Envelopes are never mutated; updating a secret means sealing a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encrypt `plaintext` under `secret` with a fresh salt and nonce.
    pub fn seal(plaintext: &str, secret: &[u8], params: &KdfParams) -> Result<Self> {
        let salt = kdf::generate_salt()?;
        let nonce = cipher::generate_nonce()?;

        let mut key = kdf::derive_key_with_params(secret, &salt, params)?;
        let sealed = cipher::seal(plaintext.as_bytes(), &key, &nonce);
        key.zeroize();
        let (ciphertext, tag) = sealed?;

        Ok(Self {
            salt,
            nonce,
            tag,
            ciphertext,
        })
    }

    /// Re-derive the key from `secret` and the stored salt, verify the
    /// tag and return the plaintext.
    pub fn open(&self, secret: &[u8], params: &KdfParams) -> Result<String> {
        let mut key = kdf::derive_key_with_params(secret, &self.salt, params)?;
        let opened = cipher::open(&self.ciphertext, &self.tag, &key, &self.nonce);
        key.zeroize();

        String::from_utf8(opened?).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            CredVaultError::MalformedEnvelope("decrypted value is not valid UTF-8".into())
        })
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            hex::encode(self.salt),
            hex::encode(self.nonce),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}

impl FromStr for Envelope {
    type Err = CredVaultError;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(CredVaultError::MalformedEnvelope(format!(
                "expected {FIELD_COUNT} fields, found {}",
                fields.len()
            )));
        }

        Ok(Self {
            salt: decode_fixed("salt", fields[0])?,
            nonce: decode_fixed("nonce", fields[1])?,
            tag: decode_fixed("tag", fields[2])?,
            ciphertext: decode_hex("ciphertext", fields[3])?,
        })
    }
}

fn decode_hex(name: &str, field: &str) -> Result<Vec<u8>> {
    hex::decode(field)
        .map_err(|e| CredVaultError::MalformedEnvelope(format!("{name} is not valid hex: {e}")))
}

fn decode_fixed<const N: usize>(name: &str, field: &str) -> Result<[u8; N]> {
    let bytes = decode_hex(name, field)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        CredVaultError::MalformedEnvelope(format!("{name} must be {N} bytes, got {len}"))
    })
}

/// Envelope encoder/decoder bound to the process-wide server secret.
///
/// The secret is injected once at construction and wiped on drop.  The
/// codec holds no mutable state, so one instance can be shared across
/// threads.
pub struct EnvelopeCodec {
    secret: Zeroizing<String>,
    params: KdfParams,
}

impl EnvelopeCodec {
    /// Build a codec with the default KDF work factor.
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_params(secret, KdfParams::default())
    }

    /// Build a codec with an explicit KDF work factor.
    pub fn with_params(secret: impl Into<String>, params: KdfParams) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            params,
        }
    }

    /// Encrypt `plaintext` into a fresh envelope string.
    pub fn encode(&self, plaintext: &str) -> Result<String> {
        Envelope::seal(plaintext, self.secret.as_bytes(), &self.params).map(|e| e.to_string())
    }

    /// Parse and decrypt an envelope string.
    pub fn decode(&self, envelope: &str) -> Result<String> {
        envelope
            .parse::<Envelope>()?
            .open(self.secret.as_bytes(), &self.params)
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }
}

impl fmt::Debug for EnvelopeCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeCodec")
            .field("secret", &"<redacted>")
            .field("params", &self.params)
            .finish()
    }
}

/// Encrypt `plaintext` under `secret` with the default work factor.
pub fn encode(plaintext: &str, secret: &str) -> Result<String> {
    Envelope::seal(plaintext, secret.as_bytes(), &KdfParams::default()).map(|e| e.to_string())
}

/// Decrypt an envelope produced by `encode`.
pub fn decode(envelope: &str, secret: &str) -> Result<String> {
    envelope
        .parse::<Envelope>()?
        .open(secret.as_bytes(), &KdfParams::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// "MyS3cret!" sealed under "server-secret" with salt 00..1f and
    /// nonce a0..af, as written by existing deployments.
    const KNOWN_ENVELOPE: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f:a0a1a2a3a4a5a6a7a8a9aaabacadaeaf:e6144acfe9711e562442a9a6f6a12f65:5bdf68a1c17db53b42";

    const KNOWN_EMPTY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f:a0a1a2a3a4a5a6a7a8a9aaabacadaeaf:086310353a22814e5fa284076a189556:";

    fn fast_codec(secret: &str) -> EnvelopeCodec {
        EnvelopeCodec::with_params(secret, KdfParams { iterations: 1_000 })
    }

    #[test]
    fn decodes_known_envelope() {
        assert_eq!(decode(KNOWN_ENVELOPE, "server-secret").unwrap(), "MyS3cret!");
    }

    #[test]
    fn decodes_known_empty_envelope() {
        assert_eq!(decode(KNOWN_EMPTY, "server-secret").unwrap(), "");
    }

    #[test]
    fn known_envelope_rejects_wrong_secret() {
        assert!(matches!(
            decode(KNOWN_ENVELOPE, "wrong-secret"),
            Err(CredVaultError::AuthenticationFailure)
        ));
    }

    #[test]
    fn formatting_roundtrips_parsed_envelope() {
        let env: Envelope = KNOWN_ENVELOPE.parse().unwrap();
        assert_eq!(env.to_string(), KNOWN_ENVELOPE);
        assert_eq!(env.ciphertext().len(), "MyS3cret!".len());
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        let upper = KNOWN_ENVELOPE.to_uppercase();
        let env: Envelope = upper.parse().unwrap();
        assert_eq!(env.to_string(), KNOWN_ENVELOPE);
    }

    #[test]
    fn encoded_fields_have_fixed_widths() {
        let encoded = fast_codec("s").encode("abc").unwrap();
        let widths: Vec<usize> = encoded.split(DELIMITER).map(str::len).collect();
        assert_eq!(widths, vec![64, 32, 32, 6]);
        assert_eq!(encoded, encoded.to_lowercase());
    }

    #[test]
    fn rejects_wrong_field_count() {
        for input in ["notanenvelope", "aa:bb:cc", "aa:bb:cc:dd:ee", ""] {
            assert!(
                matches!(
                    input.parse::<Envelope>(),
                    Err(CredVaultError::MalformedEnvelope(_))
                ),
                "{input:?} should be malformed"
            );
        }
    }

    #[test]
    fn rejects_wrong_field_widths() {
        assert!(matches!(
            "aa:bb:cc:dd".parse::<Envelope>(),
            Err(CredVaultError::MalformedEnvelope(_))
        ));

        // Salt one byte short.
        let short_salt = &KNOWN_ENVELOPE[2..];
        assert!(matches!(
            short_salt.parse::<Envelope>(),
            Err(CredVaultError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn rejects_invalid_hex() {
        let bad_char = KNOWN_ENVELOPE.replacen("5bdf", "5bzf", 1);
        assert!(matches!(
            bad_char.parse::<Envelope>(),
            Err(CredVaultError::MalformedEnvelope(_))
        ));

        let odd_length = format!("{KNOWN_ENVELOPE}4");
        assert!(matches!(
            odd_length.parse::<Envelope>(),
            Err(CredVaultError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn non_utf8_plaintext_is_malformed() {
        let params = KdfParams { iterations: 1_000 };
        let salt = [1u8; SALT_LEN];
        let nonce = [2u8; NONCE_LEN];
        let key = kdf::derive_key_with_params(b"s", &salt, &params).unwrap();
        let (ciphertext, tag) = cipher::seal(&[0xff, 0xfe, 0xfd], &key, &nonce).unwrap();
        let env = Envelope {
            salt,
            nonce,
            tag,
            ciphertext,
        };

        assert!(matches!(
            env.open(b"s", &params),
            Err(CredVaultError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn codec_roundtrip_and_freshness() {
        let codec = fast_codec("server-secret");
        let a = codec.encode("MyS3cret!").unwrap();
        let b = codec.encode("MyS3cret!").unwrap();
        assert_ne!(a, b);
        assert_eq!(codec.decode(&a).unwrap(), "MyS3cret!");
        assert_eq!(codec.decode(&b).unwrap(), "MyS3cret!");
    }

    #[test]
    fn codec_debug_redacts_secret() {
        let codec = fast_codec("do-not-print-me");
        let debug = format!("{codec:?}");
        assert!(!debug.contains("do-not-print-me"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn envelope_debug_hides_key_material() {
        let env: Envelope = KNOWN_ENVELOPE.parse().unwrap();
        let debug = format!("{env:?}");
        assert!(!debug.contains("5bdf68"));
    }
}
