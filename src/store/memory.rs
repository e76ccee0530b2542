use std::convert::Infallible;

use crate::SecretEntry;

use super::Mapper;

/// Keeps the written entries in memory and reads them back. Useful for tests and for callers
/// which persist on their own schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryMapper {
    entries: Vec<SecretEntry>,
}

impl MemoryMapper {
    /// A mapper which reads `entries` back
    pub fn new(entries: Vec<SecretEntry>) -> MemoryMapper {
        MemoryMapper { entries }
    }

    /// What was last written, including incomplete entries
    pub fn entries(&self) -> &[SecretEntry] {
        &self.entries
    }
}

impl Mapper for MemoryMapper {
    type Error = Infallible;

    fn read(&self) -> Result<Vec<SecretEntry>, Self::Error> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| !entry.secret.is_empty())
            .cloned()
            .collect())
    }

    fn write(&mut self, entries: &[SecretEntry]) -> Result<(), Self::Error> {
        self.entries = entries.to_vec();
        Ok(())
    }
}
