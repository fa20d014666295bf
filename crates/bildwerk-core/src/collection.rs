// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered file collection — the working set whose order becomes the page
// order of the output document.

use std::sync::Arc;

use tracing::debug;

use crate::error::{BildwerkError, Result};
use crate::types::ImageFileEntry;

/// The ordered working set of accepted images.
///
/// Positions are always dense (`0..len`). Order only changes through
/// [`append`](Self::append), [`remove_at`](Self::remove_at) and
/// [`move_to`](Self::move_to). Every effective mutation bumps the revision,
/// which lets the preview list detect row actions rendered against an older
/// state.
#[derive(Debug, Clone, Default)]
pub struct OrderedFileCollection {
    entries: Vec<ImageFileEntry>,
    revision: u64,
}

impl OrderedFileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validated batch at the tail, keeping the batch order.
    pub fn append(&mut self, new_entries: Vec<ImageFileEntry>) {
        if new_entries.is_empty() {
            return;
        }
        debug!(added = new_entries.len(), before = self.entries.len(), "appending entries");
        self.entries.extend(new_entries);
        self.bump();
    }

    /// Remove the entry at `position`, shifting later entries left by one.
    pub fn remove_at(&mut self, position: usize) -> Result<ImageFileEntry> {
        self.check(position)?;
        let removed = self.entries.remove(position);
        debug!(position, name = %removed.name(), "entry removed");
        self.bump();
        Ok(removed)
    }

    /// Splice-move: take the entry at `old_position` out and reinsert it so it
    /// ends up at `new_position`. Entries in between shift by one.
    ///
    /// `[A,B,C,D]` with `move_to(0, 2)` becomes `[B,C,A,D]`.
    pub fn move_to(&mut self, old_position: usize, new_position: usize) -> Result<()> {
        self.check(old_position)?;
        self.check(new_position)?;
        if old_position == new_position {
            return Ok(());
        }
        let entry = self.entries.remove(old_position);
        self.entries.insert(new_position, entry);
        debug!(old_position, new_position, "entry moved");
        self.bump();
        Ok(())
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        debug!(removed = self.entries.len(), "collection cleared");
        self.entries.clear();
        self.bump();
    }

    /// A point-in-time copy of the current order. Later mutations of the
    /// collection do not affect it.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entries: Arc::from(self.entries.as_slice()),
            revision: self.revision,
        }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ImageFileEntry> {
        self.entries.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageFileEntry> {
        self.entries.iter()
    }

    /// Monotonic mutation counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn check(&self, position: usize) -> Result<()> {
        if position < self.entries.len() {
            Ok(())
        } else {
            Err(BildwerkError::IndexOutOfRange {
                position,
                len: self.entries.len(),
            })
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Immutable ordered view of the collection at one revision.
#[derive(Debug, Clone)]
pub struct Snapshot {
    entries: Arc<[ImageFileEntry]>,
    revision: u64,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ImageFileEntry> {
        self.entries.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageFileEntry> {
        self.entries.iter()
    }

    /// Revision of the collection when the snapshot was taken.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(ImageFileEntry::name).collect()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a ImageFileEntry;
    type IntoIter = std::slice::Iter<'a, ImageFileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawFile;
    use crate::validator::FileValidator;

    fn entries(names: &[&str]) -> Vec<ImageFileEntry> {
        let raw = names
            .iter()
            .map(|n| RawFile::in_memory(*n, Some("image/png"), vec![0u8; 16]))
            .collect();
        FileValidator::filter(raw).expect("valid batch")
    }

    fn collection(names: &[&str]) -> OrderedFileCollection {
        let mut c = OrderedFileCollection::new();
        c.append(entries(names));
        c
    }

    fn names(c: &OrderedFileCollection) -> Vec<String> {
        c.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn append_preserves_batch_order_at_tail() {
        let mut c = collection(&["A", "B"]);
        c.append(entries(&["C", "D", "E"]));
        assert_eq!(c.count(), 5);
        assert_eq!(names(&c), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn append_empty_batch_leaves_revision() {
        let mut c = collection(&["A"]);
        let rev = c.revision();
        c.append(Vec::new());
        assert_eq!(c.revision(), rev);
    }

    #[test]
    fn remove_at_excises_one_without_gaps() {
        for position in 0..4 {
            let mut c = collection(&["A", "B", "C", "D"]);
            let mut expected = names(&c);
            let removed_name = expected.remove(position);

            let removed = c.remove_at(position).expect("valid position");
            assert_eq!(removed.name(), removed_name);
            assert_eq!(c.count(), 3);
            assert_eq!(names(&c), expected);
        }
    }

    #[test]
    fn remove_at_out_of_range() {
        let mut c = collection(&["A", "B"]);
        let err = c.remove_at(2).expect_err("out of range");
        assert!(matches!(err, BildwerkError::IndexOutOfRange { position: 2, len: 2 }));
        assert_eq!(c.count(), 2);
    }

    #[test]
    fn move_forward_is_splice_not_swap() {
        let mut c = collection(&["A", "B", "C", "D"]);
        c.move_to(0, 2).expect("move");
        assert_eq!(names(&c), ["B", "C", "A", "D"]);
    }

    #[test]
    fn move_backward_is_splice() {
        let mut c = collection(&["A", "B", "C", "D"]);
        c.move_to(3, 1).expect("move");
        assert_eq!(names(&c), ["A", "D", "B", "C"]);
    }

    #[test]
    fn move_to_same_position_is_noop() {
        for p in 0..3 {
            let mut c = collection(&["A", "B", "C"]);
            let rev = c.revision();
            c.move_to(p, p).expect("noop");
            assert_eq!(names(&c), ["A", "B", "C"]);
            assert_eq!(c.revision(), rev);
        }
    }

    #[test]
    fn move_rejects_invalid_positions() {
        let mut c = collection(&["A", "B", "C"]);
        assert!(c.move_to(3, 0).is_err());
        assert!(c.move_to(0, 3).is_err());
        assert_eq!(names(&c), ["A", "B", "C"]);
    }

    #[test]
    fn clear_always_empties() {
        let mut c = collection(&["A", "B", "C"]);
        c.clear();
        assert_eq!(c.count(), 0);
        assert!(c.is_empty());

        let mut empty = OrderedFileCollection::new();
        empty.clear();
        assert_eq!(empty.count(), 0);
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutation() {
        let mut c = collection(&["A", "B", "C"]);
        let snap = c.snapshot();

        c.move_to(2, 0).expect("move");
        c.remove_at(1).expect("remove");
        c.append(entries(&["Z"]));

        assert_eq!(snap.names(), ["A", "B", "C"]);
        assert_ne!(snap.revision(), c.revision());
    }

    #[test]
    fn revision_increases_on_every_mutation() {
        let mut c = OrderedFileCollection::new();
        let r0 = c.revision();
        c.append(entries(&["A", "B"]));
        let r1 = c.revision();
        c.move_to(0, 1).expect("move");
        let r2 = c.revision();
        c.remove_at(0).expect("remove");
        let r3 = c.revision();
        c.clear();
        let r4 = c.revision();
        assert!(r0 < r1 && r1 < r2 && r2 < r3 && r3 < r4);
    }
}
