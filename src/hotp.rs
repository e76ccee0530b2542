use crate::{Algorithm, OtpError};

use constant_time_eq::constant_time_eq;

use core::fmt;

/// Hotp holds what is needed to derive a code from a counter, as per [rfc-4226](https://tools.ietf.org/html/rfc4226#section-5.3). Its [secret](struct.Hotp.html#structfield.secret) field is sensitive data, treat it accordingly
#[derive(Debug, Clone)]
pub struct Hotp<T = Vec<u8>> {
    /// SHA-1 is the algorithm cited by [rfc-4226](https://tools.ietf.org/html/rfc4226#section-5.1). Any algorithm producing at least 20 bytes works with the dynamic truncation
    pub algorithm: Algorithm,
    /// The number of digits composing the code, at least 1. The code is left-padded with zeros up to this width
    pub digits: usize,
    /// non-encoded value
    pub secret: T,
}

impl<T: AsRef<[u8]>> PartialEq for Hotp<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.algorithm != other.algorithm {
            return false;
        }
        if self.digits != other.digits {
            return false;
        }
        constant_time_eq(self.secret.as_ref(), other.secret.as_ref())
    }
}

impl<T> fmt::Display for Hotp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "digits: {}; alg: {}", self.digits, self.algorithm)
    }
}

impl<T: AsRef<[u8]>> Hotp<T> {
    /// Will create a new instance of Hotp. `secret` is expected to be already decoded, see [Secret](enum.Secret.html) for base32 input
    ///
    /// # Errors
    ///
    /// Will return [OtpError::InvalidDigits] if `digits` is 0
    pub fn new(algorithm: Algorithm, digits: usize, secret: T) -> Result<Hotp<T>, OtpError> {
        if digits == 0 {
            return Err(OtpError::InvalidDigits);
        }
        Ok(Hotp {
            algorithm,
            digits,
            secret,
        })
    }

    /// Will sign the big-endian representation of the counter
    pub fn sign(&self, counter: u64) -> Vec<u8> {
        self.algorithm
            .sign(self.secret.as_ref(), counter.to_be_bytes().as_ref())
    }

    /// Will generate a code for the given counter
    pub fn generate(&self, counter: u64) -> String {
        let code = truncate(&self.sign(counter));
        // Past 19 digits the modulus no longer fits, and the 31 bits code is smaller anyway.
        let value = match 10_u64.checked_pow(self.digits as u32) {
            Some(modulus) => code % modulus,
            None => code,
        };
        format!("{1:00$}", self.digits, value)
    }

    /// Will check if token matches the code for the given counter
    pub fn check(&self, token: &str, counter: u64) -> bool {
        constant_time_eq(self.generate(counter).as_bytes(), token.as_bytes())
    }
}

/// Dynamic truncation of [rfc-4226](https://tools.ietf.org/html/rfc4226#section-5.4)
fn truncate(mac: &[u8]) -> u64 {
    let offset = (mac[mac.len() - 1] & 0x0f) as usize;
    let bytes = [mac[offset], mac[offset + 1], mac[offset + 2], mac[offset + 3]];
    u64::from(u32::from_be_bytes(bytes) & 0x7fff_ffff)
}
