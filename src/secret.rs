//! Representation of a secret either a "raw" \[u8\] or "base 32" encoded String
//!
//! Encoded secrets are decoded leniently: case is ignored and missing `=` padding is restored
//! before decoding, so `"ge"`, `"GE"` and `"GE======"` all decode to the same bytes. Input
//! which can't be produced by an encoder is still refused.
//!
//! # Examples
//!
//! ```
//! use totp_store::{Secret, Totp, Algorithm};
//!
//! let secret_b32 = Secret::Encoded(String::from("gezdgnbvgy3tqojqgezdgnbvgy3tqojq"));
//! let totp_b32 = Totp::new(
//!     Algorithm::SHA1,
//!     6,
//!     30,
//!     secret_b32.to_bytes().unwrap(),
//! ).unwrap();
//!
//! println!("code from base32:\t{}", totp_b32.now().unwrap());
//! ```

use base32::{self, Alphabet};

use constant_time_eq::constant_time_eq;

/// Different ways secret parsing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretParseError {
    /// Invalid base32 input.
    ParseBase32,
}

impl std::error::Error for SecretParseError {}

impl std::fmt::Display for SecretParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretParseError::ParseBase32 => write!(f, "Could not decode base32 secret."),
        }
    }
}

/// Decode a user supplied base32 secret.
///
/// The input is upper-cased and padded with `=` up to a multiple of 8 characters before
/// decoding. An empty input decodes to an empty secret.
///
/// # Errors
///
/// Will return [SecretParseError::ParseBase32] if the input holds characters outside of the
/// [rfc-4648](https://www.rfc-editor.org/rfc/rfc4648#section-6) alphabet, has `=` anywhere but
/// at the end, or is of a length no encoder produces (a secret missing characters).
pub fn decode_base32(secret: &str) -> Result<Vec<u8>, SecretParseError> {
    let mut normalized = secret.to_ascii_uppercase();
    let data = normalized.trim_end_matches('=').len();
    let padding = normalized.len() - data;

    if normalized[..data].contains('=') {
        return Err(SecretParseError::ParseBase32);
    }
    // 1, 3 or 6 characters past the last full block carry less than a byte.
    let partial = data % 8;
    if matches!(partial, 1 | 3 | 6) {
        return Err(SecretParseError::ParseBase32);
    }
    // Padding only ever completes the last block.
    if padding > 0 && (partial == 0 || partial + padding > 8) {
        return Err(SecretParseError::ParseBase32);
    }

    normalized.truncate(data);
    if partial != 0 {
        normalized.extend(std::iter::repeat('=').take(8 - partial));
    }
    base32::decode(Alphabet::Rfc4648 { padding: true }, &normalized)
        .ok_or(SecretParseError::ParseBase32)
}

/// Shared secret between client and server to validate token against/generate token from.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "zeroize", derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop))]
pub enum Secret {
    /// Non-encoded "raw" secret.
    Raw(Vec<u8>),
    /// Base32 encoded secret.
    Encoded(String),
}

impl PartialEq for Secret {
    /// Will check that to_bytes() returns the same.
    /// One secret can be Raw, and the other Encoded.
    /// Encoded secrets which do not decode are compared as typed.
    fn eq(&self, other: &Self) -> bool {
        match (self.to_bytes(), other.to_bytes()) {
            (Ok(left), Ok(right)) => constant_time_eq(&left, &right),
            (Err(_), Err(_)) => match (self, other) {
                (Secret::Encoded(left), Secret::Encoded(right)) => {
                    constant_time_eq(left.as_bytes(), right.as_bytes())
                }
                _ => false,
            },
            _ => false,
        }
    }
}

impl Secret {
    /// Get the inner String value as a Vec of bytes.
    ///
    /// # Errors
    ///
    /// See [decode_base32] for an `Encoded` secret. A `Raw` secret always succeeds
    pub fn to_bytes(&self) -> Result<Vec<u8>, SecretParseError> {
        match self {
            Secret::Raw(s) => Ok(s.to_vec()),
            Secret::Encoded(s) => decode_base32(s),
        }
    }
}
