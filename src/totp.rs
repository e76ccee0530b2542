use crate::{Algorithm, Hotp, OtpError};

use constant_time_eq::constant_time_eq;

use core::fmt;
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

fn system_time() -> Result<u64, SystemTimeError> {
    let t = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    Ok(t)
}

/// Totp derives the [Hotp](struct.Hotp.html) counter from the unix time, as per [rfc-6238](https://tools.ietf.org/html/rfc6238#section-4.2)
///
/// A Totp is cheap to build and never cached: every call reads the clock again.
#[derive(Debug, Clone)]
pub struct Totp<T = Vec<u8>> {
    hotp: Hotp<T>,
    /// Duration in seconds of a step. The recommended value per [rfc-6238](https://tools.ietf.org/html/rfc6238#section-5.2) is 30 seconds
    step: u64,
}

impl<T: AsRef<[u8]>> PartialEq for Totp<T> {
    fn eq(&self, other: &Self) -> bool {
        self.step == other.step && self.hotp == other.hotp
    }
}

impl<T> fmt::Display for Totp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "digits: {}; step: {}; alg: {}",
            self.hotp.digits, self.step, self.hotp.algorithm,
        )
    }
}

impl<T: AsRef<[u8]>> Totp<T> {
    /// Will create a new instance of Totp with given parameters
    ///
    /// # Description
    /// * `secret`: expect a non-encoded value, to pass in base32 string use `Secret::Encoded(String)`
    ///
    /// ```rust
    /// use totp_store::{Algorithm, Secret, Totp};
    /// let secret = Secret::Encoded("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ".to_string());
    /// let totp = Totp::new(Algorithm::SHA1, 8, 30, secret.to_bytes().unwrap()).unwrap();
    /// assert_eq!(totp.at(59), "94287082");
    /// ```
    ///
    /// # Errors
    ///
    /// Will return [OtpError::InvalidDigits] if `digits` is 0, or [OtpError::InvalidStep] if
    /// `step` is 0
    pub fn new(
        algorithm: Algorithm,
        digits: usize,
        step: u64,
        secret: T,
    ) -> Result<Totp<T>, OtpError> {
        Totp::from_hotp(Hotp::new(algorithm, digits, secret)?, step)
    }

    /// Will wrap an existing [Hotp](struct.Hotp.html) with a time step
    ///
    /// # Errors
    ///
    /// Will return [OtpError::InvalidStep] if `step` is 0
    pub fn from_hotp(hotp: Hotp<T>, step: u64) -> Result<Totp<T>, OtpError> {
        if step == 0 {
            return Err(OtpError::InvalidStep);
        }
        Ok(Totp { hotp, step })
    }

    /// The wrapped counter based generator
    pub fn hotp(&self) -> &Hotp<T> {
        &self.hotp
    }

    /// Duration of a step, in seconds
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Counter of the step containing `timestamp`. A negative quotient wraps around, as
    /// a two's complement reinterpretation.
    pub fn counter(&self, timestamp: i64) -> u64 {
        let step = i64::try_from(self.step).unwrap_or(i64::MAX);
        (timestamp / step) as u64
    }

    /// Will generate a code given the provided timestamp in seconds
    pub fn at(&self, timestamp: i64) -> String {
        self.hotp.generate(self.counter(timestamp))
    }

    /// Generate a code from the current system time
    pub fn now(&self) -> Result<String, SystemTimeError> {
        let t = system_time()?;
        Ok(self.at(t as i64))
    }

    /// Will check if token is valid given the provided timestamp in seconds. Only the step
    /// containing `timestamp` is accepted
    pub fn check(&self, token: &str, timestamp: i64) -> bool {
        constant_time_eq(self.at(timestamp).as_bytes(), token.as_bytes())
    }

    /// Will check if token is valid by current system time
    pub fn check_current(&self, token: &str) -> Result<bool, SystemTimeError> {
        let t = system_time()?;
        Ok(self.check(token, t as i64))
    }

    /// Returns the timestamp of the first second for the next step
    /// given the provided timestamp in seconds
    pub fn next_step(&self, time: u64) -> u64 {
        let step = time / self.step;

        (step + 1) * self.step
    }

    /// Returns the timestamp of the first second of the next step
    /// According to system time
    pub fn next_step_current(&self) -> Result<u64, SystemTimeError> {
        let t = system_time()?;
        Ok(self.next_step(t))
    }

    /// Give the ttl (in seconds) of the current code
    pub fn ttl(&self) -> Result<u64, SystemTimeError> {
        let t = system_time()?;
        Ok(self.step - (t % self.step))
    }
}
