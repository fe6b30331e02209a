use std::collections::HashSet;

use super::descriptor::{FileDescriptor, FileKey};

/// Minimal change set between the rendered list and the working set. Keys in
/// neither vector keep their rendered entry untouched, which is what preserves
/// already-loaded preview textures across merges.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListDelta {
    /// Keys to render fresh, in working-set order.
    pub added: Vec<FileKey>,
    /// Keys whose rendered entry must be torn down.
    pub removed: Vec<FileKey>,
}

impl ListDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Diffs the previously rendered key sequence against the current working set.
pub fn reconcile(previous: &[FileKey], current: &[FileDescriptor]) -> ListDelta {
    let current_keys: HashSet<FileKey> = current.iter().map(|f| f.key()).collect();
    let previous_keys: HashSet<&FileKey> = previous.iter().collect();

    ListDelta {
        added: current
            .iter()
            .map(|f| f.key())
            .filter(|k| !previous_keys.contains(k))
            .collect(),
        removed: previous
            .iter()
            .filter(|k| !current_keys.contains(k))
            .cloned()
            .collect(),
    }
}

/// Replace mode: the new selection supersedes everything previously rendered.
/// Implemented by diffing against an empty previous sequence; the caller is
/// expected to have cleared its rendered entries.
pub fn reconcile_replace(current: &[FileDescriptor]) -> ListDelta {
    reconcile(&[], current)
}
