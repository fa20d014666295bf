// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview list sync — projects the collection into display rows and routes
// remove/reorder gestures back into it.
//
// The display list is always re-derived in full from a fresh snapshot. Row
// actions carry the revision they were rendered at; an action from an older
// render pass is refused instead of hitting whatever now sits at its index.

use tracing::{debug, warn};

use crate::collection::OrderedFileCollection;
use crate::error::{BildwerkError, Result};
use crate::format::format_bytes;
use crate::types::{EntryId, ImageFileEntry};

/// Capability the reorder widget talks to. The core never depends on a
/// concrete UI toolkit; the collection implements this directly.
pub trait ReorderSink {
    fn on_reorder(&mut self, old_index: usize, new_index: usize) -> Result<()>;
}

impl ReorderSink for OrderedFileCollection {
    fn on_reorder(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        self.move_to(old_index, new_index)
    }
}

/// A position bound at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAction {
    pub position: usize,
    pub revision: u64,
}

/// One rendered row of the preview list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub position: usize,
    pub id: EntryId,
    pub name: String,
    pub size_label: String,
    /// Data URI of the thumbnail, or `None` while it is still being derived.
    pub thumbnail: Option<String>,
    pub remove: RowAction,
}

/// Stateless projection between the collection and the rendered list.
pub struct PreviewListSync;

impl PreviewListSync {
    /// Re-derive every row from a fresh snapshot.
    pub fn render(collection: &OrderedFileCollection) -> Vec<DisplayRow> {
        let snapshot = collection.snapshot();
        let revision = snapshot.revision();
        snapshot
            .iter()
            .enumerate()
            .map(|(position, entry)| DisplayRow {
                position,
                id: entry.id(),
                name: entry.name().to_string(),
                size_label: format_bytes(entry.size_bytes()),
                thumbnail: entry.preview().map(str::to_string),
                remove: RowAction { position, revision },
            })
            .collect()
    }

    /// Apply a row's remove action, provided it was rendered against the
    /// collection's current revision.
    pub fn remove(
        collection: &mut OrderedFileCollection,
        action: RowAction,
    ) -> Result<ImageFileEntry> {
        let current = collection.revision();
        if action.revision != current {
            warn!(
                position = action.position,
                action_revision = action.revision,
                current_revision = current,
                "discarding stale remove action"
            );
            return Err(BildwerkError::StaleRowAction {
                action_revision: action.revision,
                current_revision: current,
            });
        }
        collection.remove_at(action.position)
    }

    /// Entries whose thumbnail has not been derived yet.
    pub fn pending_thumbnails(collection: &OrderedFileCollection) -> Vec<ImageFileEntry> {
        collection
            .iter()
            .filter(|entry| entry.preview().is_none())
            .cloned()
            .collect()
    }

    /// Text of the item count badge next to the list heading.
    pub fn count_badge(count: usize) -> String {
        format!("({count})")
    }
}

/// A drag in progress on the preview list.
///
/// The start index is the rendered index where the drag began; the drop
/// index is the rendered index it ended on. Exactly one reorder is issued per
/// completed gesture, and nothing is reordered locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragGesture {
    origin: Option<usize>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, index: usize) {
        debug!(index, "drag started");
        self.origin = Some(index);
    }

    pub fn origin(&self) -> Option<usize> {
        self.origin
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }

    /// Finish the gesture on `index`. Returns `Ok(false)` when no drag was in
    /// progress.
    pub fn drop_on<S: ReorderSink + ?Sized>(&mut self, index: usize, sink: &mut S) -> Result<bool> {
        let Some(origin) = self.origin.take() else {
            return Ok(false);
        };
        debug!(from = origin, to = index, "drag dropped");
        sink.on_reorder(origin, index)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawFile;
    use crate::validator::FileValidator;

    fn collection(names: &[&str]) -> OrderedFileCollection {
        let raw = names
            .iter()
            .map(|n| RawFile::in_memory(*n, Some("image/jpeg"), vec![0u8; 1536]))
            .collect();
        let mut c = OrderedFileCollection::new();
        c.append(FileValidator::filter(raw).expect("valid"));
        c
    }

    /// Records every reorder it receives.
    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<(usize, usize)>,
    }

    impl ReorderSink for RecordingSink {
        fn on_reorder(&mut self, old_index: usize, new_index: usize) -> Result<()> {
            self.calls.push((old_index, new_index));
            Ok(())
        }
    }

    #[test]
    fn rows_match_collection_order() {
        let mut c = collection(&["A", "B", "C"]);
        c.move_to(2, 0).expect("move");

        let rows = PreviewListSync::render(&c);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.position, i);
            assert_eq!(row.remove.position, i);
            assert_eq!(row.remove.revision, c.revision());
            assert_eq!(row.size_label, "1.5 KB");
        }
    }

    #[test]
    fn thumbnail_appears_after_population() {
        let c = collection(&["A"]);
        assert!(PreviewListSync::render(&c)[0].thumbnail.is_none());
        assert_eq!(PreviewListSync::pending_thumbnails(&c).len(), 1);

        c.get(0).expect("entry").set_preview("data:image/png;base64,xyz".into());
        let rows = PreviewListSync::render(&c);
        assert_eq!(rows[0].thumbnail.as_deref(), Some("data:image/png;base64,xyz"));
        assert!(PreviewListSync::pending_thumbnails(&c).is_empty());
    }

    #[test]
    fn remove_uses_fresh_render() {
        let mut c = collection(&["A", "B", "C"]);
        let rows = PreviewListSync::render(&c);
        PreviewListSync::remove(&mut c, rows[1].remove).expect("remove B");

        let rows = PreviewListSync::render(&c);
        PreviewListSync::remove(&mut c, rows[1].remove).expect("remove C");
        let names: Vec<&str> = c.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["A"]);
    }

    #[test]
    fn stale_remove_is_rejected() {
        let mut c = collection(&["A", "B", "C"]);
        let stale_rows = PreviewListSync::render(&c);
        PreviewListSync::remove(&mut c, stale_rows[0].remove).expect("remove A");

        let err = PreviewListSync::remove(&mut c, stale_rows[1].remove).expect_err("stale");
        assert!(matches!(err, BildwerkError::StaleRowAction { .. }));
        assert_eq!(c.count(), 2);
    }

    #[test]
    fn drag_issues_exactly_one_reorder() {
        let mut sink = RecordingSink::default();
        let mut drag = DragGesture::new();
        drag.begin(0);
        assert!(drag.drop_on(2, &mut sink).expect("drop"));
        assert_eq!(sink.calls, [(0, 2)]);
        assert!(!drag.is_active());

        // A second drop without a new drag does nothing.
        assert!(!drag.drop_on(1, &mut sink).expect("drop"));
        assert_eq!(sink.calls.len(), 1);
    }

    #[test]
    fn drag_onto_collection_is_splice() {
        let mut c = collection(&["A", "B", "C", "D"]);
        let mut drag = DragGesture::new();
        drag.begin(0);
        drag.drop_on(2, &mut c).expect("drop");

        let rows = PreviewListSync::render(&c);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A", "D"]);
    }

    #[test]
    fn cancelled_drag_issues_nothing() {
        let mut sink = RecordingSink::default();
        let mut drag = DragGesture::new();
        drag.begin(1);
        drag.cancel();
        assert!(!drag.drop_on(0, &mut sink).expect("drop"));
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn count_badge_text() {
        assert_eq!(PreviewListSync::count_badge(0), "(0)");
        assert_eq!(PreviewListSync::count_badge(12), "(12)");
    }
}
