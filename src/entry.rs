use crate::{Algorithm, EntryError, OtpError, Secret, Totp};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Used when an entry leaves its algorithm empty
pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::SHA1;
/// Used when an entry leaves its digits at 0
pub const DEFAULT_DIGITS: usize = 6;
/// Used when an entry leaves its step at 0. The recommended value per [rfc-6238](https://tools.ietf.org/html/rfc6238#section-5.2)
pub const DEFAULT_STEP: u64 = 30;

/// A named secret, as typed by the user and as persisted by a [Mapper](crate::Mapper).
///
/// Zero and empty fields are kept as such. They are resolved to their defaults only when a
/// generator is requested through [SecretEntry::totp].
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde_support", serde(default))]
pub struct SecretEntry {
    /// Unique key within a [SecretStore](crate::SecretStore). Must not be empty
    pub name: String,
    /// Display only, for example the name of the service
    pub issuer: Option<String>,
    /// Base32 encoded, stored verbatim. Must not be empty
    pub secret: String,
    /// `sha1`, `sha256`, `sha512` or empty for `sha1`
    pub algorithm: String,
    /// 0 for [DEFAULT_DIGITS]
    pub digits: usize,
    /// Seconds, 0 for [DEFAULT_STEP]. Must not be negative
    pub step: i64,
}

impl SecretEntry {
    /// An entry with every optional field left to its default
    pub fn new<N: Into<String>, S: Into<String>>(name: N, secret: S) -> SecretEntry {
        SecretEntry {
            name: name.into(),
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Will check the fields a store relies on
    ///
    /// # Errors
    ///
    /// Will return an [EntryError] for an empty name, an empty secret or a negative step
    pub fn validate(&self) -> Result<(), EntryError> {
        if self.name.is_empty() {
            return Err(EntryError::EmptyName);
        }
        if self.secret.is_empty() {
            return Err(EntryError::EmptySecret);
        }
        if self.step < 0 {
            return Err(EntryError::NegativeStep(self.step));
        }
        Ok(())
    }

    /// The named algorithm, [DEFAULT_ALGORITHM] when empty
    pub fn resolved_algorithm(&self) -> Result<Algorithm, OtpError> {
        if self.algorithm.is_empty() {
            return Ok(DEFAULT_ALGORITHM);
        }
        Ok(Algorithm::from_name(&self.algorithm)?)
    }

    /// The code width, [DEFAULT_DIGITS] when 0
    pub fn resolved_digits(&self) -> usize {
        match self.digits {
            0 => DEFAULT_DIGITS,
            digits => digits,
        }
    }

    /// Will return [OtpError::InvalidStep] for a negative step
    pub fn resolved_step(&self) -> Result<u64, OtpError> {
        match self.step {
            0 => Ok(DEFAULT_STEP),
            step => u64::try_from(step).map_err(|_| OtpError::InvalidStep),
        }
    }

    /// Will build a ready to use generator: the secret is base32 decoded, the algorithm
    /// resolved, and zero digits and step replaced by their defaults. The entry is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Will return an [OtpError] if the secret is not valid base32 or the algorithm is unknown
    pub fn totp(&self) -> Result<Totp, OtpError> {
        let algorithm = self.resolved_algorithm()?;
        let step = self.resolved_step()?;
        let secret = Secret::Encoded(self.secret.clone()).to_bytes()?;
        log::trace!(
            "building generator for \"{}\" ({}, {} digits, {}s)",
            self.name,
            algorithm,
            self.resolved_digits(),
            step
        );
        Totp::new(algorithm, self.resolved_digits(), step, secret)
    }
}
