//! Ordered collection of named [SecretEntry], and the [Mapper] boundary it is persisted through.
//!
//! A store only ever holds valid entries with pairwise distinct names. It is not synchronized:
//! share it between threads behind a lock, since the entries and the name index are updated
//! together.

use std::collections::HashMap;

use crate::{SecretEntry, StoreError};

pub mod memory;

/// Converts between the entries of a store and their persisted representation.
///
/// Implementations own the commit boundary: a failed `write` must leave the previous content
/// in place, and the underlying resource must be released on every path.
pub trait Mapper {
    /// Passed through as [StoreError::Mapper]
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every persisted entry, in order. Entries with an empty secret are incomplete and must
    /// be skipped.
    fn read(&self) -> Result<Vec<SecretEntry>, Self::Error>;

    /// Replace the persisted content with `entries`.
    fn write(&mut self, entries: &[SecretEntry]) -> Result<(), Self::Error>;
}

/// Insertion ordered entries, indexed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretStore {
    entries: Vec<SecretEntry>,
    index: HashMap<String, usize>,
}

impl SecretStore {
    /// An empty store
    pub fn new() -> SecretStore {
        SecretStore::default()
    }

    /// A store holding what `mapper` reads.
    ///
    /// # Errors
    ///
    /// See [SecretStore::load]
    pub fn from_mapper<M: Mapper>(mapper: &M) -> Result<SecretStore, StoreError> {
        let mut store = SecretStore::new();
        store.load(mapper)?;
        Ok(store)
    }

    /// Will append `entry` once it is validated and its name is free.
    ///
    /// # Errors
    ///
    /// Will return [StoreError::InvalidEntry] or [StoreError::DuplicateName], leaving the store
    /// unchanged
    pub fn add(&mut self, entry: SecretEntry) -> Result<(), StoreError> {
        entry.validate()?;
        if self.index.contains_key(&entry.name) {
            return Err(StoreError::DuplicateName(entry.name));
        }
        self.index.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Entries in the order they were added
    pub fn list(&self) -> &[SecretEntry] {
        &self.entries
    }

    /// Absent names are not an error
    pub fn find_by_name(&self, name: &str) -> Option<&SecretEntry> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entry was admitted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order they were added
    pub fn iter(&self) -> std::slice::Iter<'_, SecretEntry> {
        self.entries.iter()
    }

    /// Will append every entry `mapper` reads, in order. The batch is all or nothing: if one
    /// entry is rejected, none of them is kept.
    ///
    /// # Errors
    ///
    /// Will return [StoreError::Mapper] if reading fails, or the error of the first rejected
    /// entry
    pub fn load<M: Mapper>(&mut self, mapper: &M) -> Result<(), StoreError> {
        let entries = mapper
            .read()
            .map_err(|e| StoreError::Mapper(Box::new(e)))?;
        let read = entries.len();

        let mut staged = self.clone();
        for entry in entries {
            if let Err(e) = staged.add(entry) {
                log::warn!("rejecting loaded batch of {} entries: {}", read, e);
                return Err(e);
            }
        }
        *self = staged;

        log::debug!("loaded {} entries, store holds {}", read, self.len());
        Ok(())
    }

    /// Will hand every entry to `mapper`, in order. There is no diffing: the whole store is
    /// written each time.
    ///
    /// # Errors
    ///
    /// Will return [StoreError::Mapper] if writing fails
    pub fn persist<M: Mapper>(&self, mapper: &mut M) -> Result<(), StoreError> {
        mapper
            .write(&self.entries)
            .map_err(|e| StoreError::Mapper(Box::new(e)))?;
        log::debug!("persisted {} entries", self.len());
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SecretStore {
    type Item = &'a SecretEntry;
    type IntoIter = std::slice::Iter<'a, SecretEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryMapper;
    use super::*;
    use crate::EntryError;

    fn entry(name: &str) -> SecretEntry {
        SecretEntry::new(name, "GE")
    }

    /// Fails every call, to check failures are passed through
    struct BrokenMapper;

    impl Mapper for BrokenMapper {
        type Error = std::io::Error;

        fn read(&self) -> Result<Vec<SecretEntry>, Self::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
        }

        fn write(&mut self, _: &[SecretEntry]) -> Result<(), Self::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    /// Hands back whatever it was given, without the empty secret filtering
    struct RawMapper(Vec<SecretEntry>);

    impl Mapper for RawMapper {
        type Error = std::convert::Infallible;

        fn read(&self) -> Result<Vec<SecretEntry>, Self::Error> {
            Ok(self.0.clone())
        }

        fn write(&mut self, entries: &[SecretEntry]) -> Result<(), Self::Error> {
            self.0 = entries.to_vec();
            Ok(())
        }
    }

    #[test]
    fn add_and_list() {
        let mut store = SecretStore::new();
        assert!(store.is_empty());
        for name in ["c", "a", "b"] {
            store.add(entry(name)).unwrap();
        }
        let names: Vec<&str> = store.list().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn add_rejects_invalid() {
        let mut store = SecretStore::new();
        store.add(entry("kept")).unwrap();

        let invalid = [
            SecretEntry::new("", "GE"),
            SecretEntry::new("n", ""),
            SecretEntry {
                step: -1,
                ..entry("n")
            },
        ];
        for e in invalid {
            let err = store.add(e).unwrap_err();
            assert!(matches!(err, StoreError::InvalidEntry(_)));
        }
        assert_eq!(store.list(), [entry("kept")]);
        assert!(store.find_by_name("n").is_none());
    }

    #[test]
    fn add_rejects_duplicate() {
        let mut store = SecretStore::new();
        store.add(entry("n")).unwrap();
        let second = SecretEntry {
            issuer: Some("other".to_string()),
            ..entry("n")
        };
        let err = store.add(second).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(ref name) if name == "n"));
        assert_eq!(store.list(), [entry("n")]);
    }

    #[test]
    fn find_by_name() {
        let mut store = SecretStore::new();
        store.add(entry("a")).unwrap();
        store.add(entry("b")).unwrap();
        assert_eq!(store.find_by_name("b"), Some(&entry("b")));
        assert_eq!(store.find_by_name("missing"), None);
    }

    #[test]
    fn iterates_in_order() {
        let mut store = SecretStore::new();
        store.add(entry("a")).unwrap();
        store.add(entry("b")).unwrap();
        let names: Vec<&String> = (&store).into_iter().map(|e| &e.name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(store.iter().count(), 2);
    }

    #[test]
    fn load_then_persist_round_trips() {
        let entries = vec![
            SecretEntry {
                issuer: Some("issuer-1".to_string()),
                algorithm: "sha1".to_string(),
                digits: 6,
                step: 30,
                ..SecretEntry::new("Name-1", "GEZDGNBVGY3TQOJQ")
            },
            SecretEntry {
                algorithm: "sha512".to_string(),
                digits: 8,
                step: 60,
                ..SecretEntry::new("Name-2", "GE")
            },
            SecretEntry::new("Name-3", "ge"),
        ];
        let source = MemoryMapper::new(entries.clone());
        let store = SecretStore::from_mapper(&source).unwrap();
        assert_eq!(store.list(), entries.as_slice());

        let mut sink = MemoryMapper::default();
        store.persist(&mut sink).unwrap();
        assert_eq!(sink.entries(), entries.as_slice());
        assert_eq!(SecretStore::from_mapper(&sink).unwrap(), store);
    }

    #[test]
    fn load_appends() {
        let mut store = SecretStore::new();
        store.add(entry("a")).unwrap();
        store
            .load(&MemoryMapper::new(vec![entry("b"), entry("c")]))
            .unwrap();
        let names: Vec<&str> = store.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(store.find_by_name("c").is_some());
    }

    #[test]
    fn load_rejects_whole_batch_on_duplicate() {
        let mut store = SecretStore::new();
        store.add(entry("a")).unwrap();
        let before = store.clone();

        let err = store
            .load(&MemoryMapper::new(vec![entry("b"), entry("a"), entry("c")]))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(ref name) if name == "a"));
        assert_eq!(store, before);
        assert!(store.find_by_name("b").is_none());
    }

    #[test]
    fn load_rejects_whole_batch_on_invalid() {
        let mut store = SecretStore::new();
        let bad = SecretEntry {
            step: -5,
            ..entry("bad")
        };
        let err = store
            .load(&RawMapper(vec![entry("a"), bad]))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidEntry(EntryError::NegativeStep(-5))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn load_passes_mapper_failure() {
        let mut store = SecretStore::new();
        let err = store.load(&BrokenMapper).unwrap_err();
        assert_eq!(err.to_string(), "Mapper failed: gone");
        assert!(store.is_empty());
    }

    #[test]
    fn persist_passes_mapper_failure() {
        let mut store = SecretStore::new();
        store.add(entry("a")).unwrap();
        let err = store.persist(&mut BrokenMapper).unwrap_err();
        assert!(matches!(err, StoreError::Mapper(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn persist_writes_everything_each_time() {
        let mut store = SecretStore::new();
        let mut mapper = RawMapper(Vec::new());
        store.add(entry("a")).unwrap();
        store.persist(&mut mapper).unwrap();
        store.add(entry("b")).unwrap();
        store.persist(&mut mapper).unwrap();
        assert_eq!(mapper.0, vec![entry("a"), entry("b")]);
    }
}
