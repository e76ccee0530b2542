//! This library generates one-time authentication codes, counter based per [rfc-4226](https://tools.ietf.org/html/rfc4226) and time based per [rfc-6238](https://tools.ietf.org/html/rfc6238), from base32 secrets kept in a validated store of named entries.
//!
//! Entries keep their fields as the user typed them. Defaults (SHA1, 6 digits, 30 seconds)
//! are only applied when a generator is built from an entry, so a stored zero stays a zero.
//!
//! The store itself never touches the disk: it hands its entries to a [Mapper](store::Mapper),
//! which owns the persisted representation.
//!
//! # Examples
//!
//! ```rust
//! use totp_store::{SecretEntry, SecretStore};
//! use totp_store::store::memory::MemoryMapper;
//!
//! let mut store = SecretStore::new();
//! store
//!     .add(SecretEntry::new("github", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"))
//!     .unwrap();
//!
//! let totp = store.find_by_name("github").unwrap().totp().unwrap();
//! assert_eq!(totp.at(59), "287082");
//!
//! let mut mapper = MemoryMapper::default();
//! store.persist(&mut mapper).unwrap();
//! assert_eq!(SecretStore::from_mapper(&mapper).unwrap().list(), store.list());
//! ```
//!
//! ```rust
//! use totp_store::{Algorithm, Hotp};
//!
//! let hotp = Hotp::new(Algorithm::SHA1, 6, b"12345678901234567890".to_vec()).unwrap();
//! assert_eq!(hotp.generate(0), "755224");
//! ```

mod entry;
mod error;
mod hotp;
mod secret;
pub mod store;
mod totp;

pub use entry::{SecretEntry, DEFAULT_ALGORITHM, DEFAULT_DIGITS, DEFAULT_STEP};
pub use error::{EntryError, OtpError, StoreError, UnsupportedAlgorithm};
pub use hotp::Hotp;
pub use secret::{decode_base32, Secret, SecretParseError};
pub use store::{Mapper, SecretStore};
pub use totp::Totp;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use core::fmt;
use std::str::FromStr;

use hmac::Mac;

type HmacSha1 = hmac::Hmac<sha1::Sha1>;
type HmacSha256 = hmac::Hmac<sha2::Sha256>;
type HmacSha512 = hmac::Hmac<sha2::Sha512>;

/// Algorithm enum holds the three standards algorithms for TOTP as per the [reference implementation](https://tools.ietf.org/html/rfc6238#appendix-A)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum Algorithm {
    #[default]
    SHA1,
    SHA256,
    SHA512,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::SHA1 => f.write_str("SHA1"),
            Algorithm::SHA256 => f.write_str("SHA256"),
            Algorithm::SHA512 => f.write_str("SHA512"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = UnsupportedAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::from_name(s)
    }
}

impl Algorithm {
    /// Resolve a stored algorithm name. The empty name resolves to [`Algorithm::SHA1`].
    ///
    /// # Errors
    ///
    /// Will return [UnsupportedAlgorithm] for anything but `sha1`, `sha256` or `sha512` (in any case)
    pub fn from_name(name: &str) -> Result<Self, UnsupportedAlgorithm> {
        if name.is_empty() {
            return Ok(Algorithm::default());
        }
        match name.to_ascii_lowercase().as_str() {
            "sha1" => Ok(Algorithm::SHA1),
            "sha256" => Ok(Algorithm::SHA256),
            "sha512" => Ok(Algorithm::SHA512),
            _ => Err(UnsupportedAlgorithm(name.to_string())),
        }
    }

    /// Lower-case name, as written by entries
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::SHA1 => "sha1",
            Algorithm::SHA256 => "sha256",
            Algorithm::SHA512 => "sha512",
        }
    }

    fn hash<D>(mut digest: D, data: &[u8]) -> Vec<u8>
    where
        D: Mac,
    {
        digest.update(data);
        digest.finalize().into_bytes().to_vec()
    }

    fn sign(&self, key: &[u8], data: &[u8]) -> Vec<u8> {
        const KEY_LEN: &str = "HMAC accepts keys of any length";
        match self {
            Algorithm::SHA1 => Algorithm::hash(HmacSha1::new_from_slice(key).expect(KEY_LEN), data),
            Algorithm::SHA256 => {
                Algorithm::hash(HmacSha256::new_from_slice(key).expect(KEY_LEN), data)
            }
            Algorithm::SHA512 => {
                Algorithm::hash(HmacSha512::new_from_slice(key).expect(KEY_LEN), data)
            }
        }
    }
}
