use std::collections::HashSet;

use super::descriptor::{FileDescriptor, FileKey};
use super::validator;

/// Raised by removal operations when the working set transitions to empty, so
/// the owner of the selection surface can clear it. A repeat selection of the
/// same file must then register as a change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySignal {
    None,
    ResetInput,
}

/// Authoritative working set of selected files, ordered by insertion, unique
/// by identity key, with the subset of keys currently failing validation.
#[derive(Default)]
pub struct FileRegistry {
    files: Vec<FileDescriptor>,
    invalid: HashSet<FileKey>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends descriptors whose key is not already present, then re-validates
    /// the whole set. Existing order is preserved; duplicates are dropped.
    pub fn merge_add(&mut self, new_descriptors: Vec<FileDescriptor>) {
        let existing: HashSet<FileKey> = self.files.iter().map(|f| f.key()).collect();
        let mut seen = existing;
        for descriptor in new_descriptors {
            let key = descriptor.key();
            if seen.insert(key) {
                self.files.push(descriptor);
            }
        }
        self.revalidate();
    }

    /// Removes the descriptor with the given key from the working set and the
    /// invalid subset.
    pub fn remove(&mut self, key: &FileKey) -> RegistrySignal {
        let was_empty = self.files.is_empty();
        self.files.retain(|f| &f.key() != key);
        self.invalid.remove(key);
        self.empty_transition_signal(was_empty)
    }

    /// Removes every descriptor currently failing validation.
    pub fn remove_all_invalid(&mut self) -> RegistrySignal {
        if self.invalid.is_empty() {
            return RegistrySignal::None;
        }
        let was_empty = self.files.is_empty();
        let invalid = std::mem::take(&mut self.invalid);
        self.files.retain(|f| !invalid.contains(&f.key()));
        self.empty_transition_signal(was_empty)
    }

    /// Submission is allowed only for a non-empty, fully valid set.
    pub fn can_submit(&self) -> bool {
        self.invalid.is_empty() && !self.files.is_empty()
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn has_invalid(&self) -> bool {
        !self.invalid.is_empty()
    }

    pub fn is_invalid(&self, key: &FileKey) -> bool {
        self.invalid.contains(key)
    }

    // Rebuilt from scratch on every mutation so the invalid subset can never
    // drift from the working set.
    fn revalidate(&mut self) {
        self.invalid = self
            .files
            .iter()
            .filter(|f| !validator::validate(f).valid)
            .map(|f| f.key())
            .collect();
    }

    fn empty_transition_signal(&self, was_empty: bool) -> RegistrySignal {
        if !was_empty && self.files.is_empty() {
            RegistrySignal::ResetInput
        } else {
            RegistrySignal::None
        }
    }
}
