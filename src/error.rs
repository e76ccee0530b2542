use crate::SecretParseError;

/// An algorithm name outside of `sha1`, `sha256` and `sha512`
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnsupportedAlgorithm(pub String);

impl std::error::Error for UnsupportedAlgorithm {}

impl std::fmt::Display for UnsupportedAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Algorithm can only be sha1, sha256 or sha512, not \"{}\"",
            self.0
        )
    }
}

/// Why an entry could not be admitted to a store
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EntryError {
    /// The name is the key of an entry
    EmptyName,
    /// Nothing to derive codes from
    EmptySecret,
    /// Holds the rejected step
    NegativeStep(i64),
}

impl std::error::Error for EntryError {}

impl std::fmt::Display for EntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryError::EmptyName => write!(f, "Entry name can't be empty"),
            EntryError::EmptySecret => write!(f, "Entry secret can't be empty"),
            EntryError::NegativeStep(step) => write!(
                f,
                "Entry step can't be negative. {} is not allowed",
                step
            ),
        }
    }
}

/// Building a generator failed
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OtpError {
    /// The secret is not valid base32
    Secret(SecretParseError),
    /// The algorithm name is unknown
    Algorithm(UnsupportedAlgorithm),
    /// Codes need at least one digit
    InvalidDigits,
    /// The step is 0 or negative
    InvalidStep,
}

impl std::error::Error for OtpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OtpError::Secret(e) => Some(e),
            OtpError::Algorithm(e) => Some(e),
            OtpError::InvalidDigits | OtpError::InvalidStep => None,
        }
    }
}

impl std::fmt::Display for OtpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OtpError::Secret(e) => write!(f, "Invalid secret: {}", e),
            OtpError::Algorithm(e) => write!(f, "{}", e),
            OtpError::InvalidDigits => write!(f, "Codes must have at least 1 digit"),
            OtpError::InvalidStep => write!(f, "Step must be a positive number of seconds"),
        }
    }
}

impl From<SecretParseError> for OtpError {
    fn from(e: SecretParseError) -> Self {
        OtpError::Secret(e)
    }
}

impl From<UnsupportedAlgorithm> for OtpError {
    fn from(e: UnsupportedAlgorithm) -> Self {
        OtpError::Algorithm(e)
    }
}

/// A store operation failed. The store is left as it was before the operation
#[derive(Debug)]
pub enum StoreError {
    /// The entry failed [validation](crate::SecretEntry::validate)
    InvalidEntry(EntryError),
    /// Holds the name already taken
    DuplicateName(String),
    /// Reported by the [Mapper](crate::Mapper), passed through untouched
    Mapper(Box<dyn std::error::Error + Send + Sync>),
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::InvalidEntry(e) => Some(e),
            StoreError::DuplicateName(_) => None,
            StoreError::Mapper(e) => Some(e.as_ref()),
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::InvalidEntry(e) => write!(f, "Entry validation failed: {}", e),
            StoreError::DuplicateName(name) => {
                write!(f, "An entry named \"{}\" already exists", name)
            }
            StoreError::Mapper(e) => write!(f, "Mapper failed: {}", e),
        }
    }
}

impl From<EntryError> for StoreError {
    fn from(e: EntryError) -> Self {
        StoreError::InvalidEntry(e)
    }
}
