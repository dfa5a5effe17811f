//! Canonical field storage with undo/redo.
//!
//! [`FieldStore`] is the single owner of the authoritative field collection.
//! Its mutating entry points are crate-private: editing surfaces reach them
//! only through [`UpdatePipeline`](crate::UpdatePipeline), which validates and
//! normalizes proposals first. Every mutation either commits completely and
//! records one history frame, or fails and leaves the store untouched.

use std::collections::HashSet;

use crate::history::{FieldChange, History, HistoryFrame};
use crate::{DesignerError, DesignerResult, Field, FieldId, FieldPatch};

/// Ordered collection of fields plus its edit history.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    /// Fields in creation order.
    fields: Vec<Field>,
    history: History,
}

impl FieldStore {
    /// Create an empty store with the default history limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store keeping at most `limit` undo frames (0 = unlimited).
    #[must_use]
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            fields: Vec::new(),
            history: History::with_limit(limit),
        }
    }

    /// Get a field by ID.
    #[must_use]
    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    /// Check if a field with this ID exists.
    #[must_use]
    pub fn contains(&self, id: FieldId) -> bool {
        self.get(id).is_some()
    }

    /// All fields in store order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Owned copy of the whole collection.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Field> {
        self.fields.clone()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if there is an operation to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if there is an undone operation to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Render the collection as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DesignerResult<String> {
        serde_json::to_string_pretty(&self.fields).map_err(DesignerError::Serialization)
    }

    fn position(&self, id: FieldId) -> DesignerResult<usize> {
        self.fields
            .iter()
            .position(|field| field.id == id)
            .ok_or(DesignerError::NotFound(id))
    }

    fn check_new(&self, field: &Field) -> DesignerResult<()> {
        field.locations.validate()?;
        if self.contains(field.id) {
            return Err(DesignerError::invalid_attribute(
                "id",
                format!("{} is already in use", field.id),
            ));
        }
        Ok(())
    }

    /// Append a new field.
    pub(crate) fn create(&mut self, field: Field) -> DesignerResult<Field> {
        self.check_new(&field)?;
        let index = self.fields.len();
        self.history.record(HistoryFrame {
            changes: vec![FieldChange {
                index,
                before: None,
                after: Some(field.clone()),
            }],
        });
        tracing::debug!("Created field {} at index {index}", field.id);
        self.fields.push(field.clone());
        Ok(field)
    }

    /// Append several fields as a single undo step.
    ///
    /// All fields are validated before any is inserted.
    pub(crate) fn create_batch(&mut self, batch: Vec<Field>) -> DesignerResult<Vec<Field>> {
        let mut seen = HashSet::new();
        for field in &batch {
            self.check_new(field)?;
            if !seen.insert(field.id) {
                return Err(DesignerError::invalid_attribute(
                    "id",
                    format!("{} appears twice in the batch", field.id),
                ));
            }
        }
        if batch.is_empty() {
            return Ok(batch);
        }

        let start = self.fields.len();
        let changes = batch
            .iter()
            .enumerate()
            .map(|(offset, field)| FieldChange {
                index: start + offset,
                before: None,
                after: Some(field.clone()),
            })
            .collect();
        self.history.record(HistoryFrame { changes });
        tracing::debug!("Created {} fields in one batch", batch.len());
        self.fields.extend(batch.iter().cloned());
        Ok(batch)
    }

    /// Merge `patch` into the identified field and return the new snapshot.
    pub(crate) fn apply_patch(&mut self, id: FieldId, patch: &FieldPatch) -> DesignerResult<Field> {
        let index = self.position(id)?;
        let before = &self.fields[index];
        let after = patch.merged(before);
        after.locations.validate()?;

        self.history.record(HistoryFrame {
            changes: vec![FieldChange {
                index,
                before: Some(before.clone()),
                after: Some(after.clone()),
            }],
        });
        tracing::debug!("Patched field {id}");
        self.fields[index] = after.clone();
        Ok(after)
    }

    /// Remove a field and return its last snapshot.
    pub(crate) fn delete(&mut self, id: FieldId) -> DesignerResult<Field> {
        let index = self.position(id)?;
        let removed = self.fields.remove(index);
        self.history.record(HistoryFrame {
            changes: vec![FieldChange {
                index,
                before: Some(removed.clone()),
                after: None,
            }],
        });
        tracing::debug!("Deleted field {id} from index {index}");
        Ok(removed)
    }

    /// Revert the most recent frame and return the resulting collection.
    ///
    /// Returns `None` when there is nothing to undo.
    pub(crate) fn undo(&mut self) -> Option<Vec<Field>> {
        let Self { fields, history } = self;
        let frame = history.undo()?;
        for change in frame.changes.iter().rev() {
            swap_in(fields, change.index, change.after.as_ref(), change.before.as_ref());
        }
        tracing::debug!("Undo reverted {} change(s)", frame.changes.len());
        Some(fields.clone())
    }

    /// Re-apply the most recently undone frame and return the resulting
    /// collection.
    ///
    /// Returns `None` when there is nothing to redo.
    pub(crate) fn redo(&mut self) -> Option<Vec<Field>> {
        let Self { fields, history } = self;
        let frame = history.redo()?;
        for change in &frame.changes {
            swap_in(fields, change.index, change.before.as_ref(), change.after.as_ref());
        }
        tracing::debug!("Redo re-applied {} change(s)", frame.changes.len());
        Some(fields.clone())
    }
}

/// Replace the `from` state of a field with the `to` state.
fn swap_in(fields: &mut Vec<Field>, index: usize, from: Option<&Field>, to: Option<&Field>) {
    match (from, to) {
        (Some(from), Some(to)) => {
            if let Some(slot) = fields.iter_mut().find(|field| field.id == from.id) {
                *slot = to.clone();
            }
        }
        (Some(from), None) => fields.retain(|field| field.id != from.id),
        (None, Some(to)) => {
            let index = index.min(fields.len());
            fields.insert(index, to.clone());
        }
        (None, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Locations;

    fn field(name: &str, page: u32) -> Field {
        Field {
            id: FieldId::new(),
            name: name.to_string(),
            locations: Locations::new(page, 10.0, 10.0, 50.0, 20.0),
            recipient_index: 0,
            required: false,
            read_only: false,
            input_type: "TEXT_FIELD".to_string(),
            content_type: "DATA".to_string(),
        }
    }

    fn store_with(names: &[&str]) -> (FieldStore, Vec<FieldId>) {
        let mut store = FieldStore::new();
        let ids = names
            .iter()
            .map(|name| store.create(field(name, 1)).expect("create").id)
            .collect();
        (store, ids)
    }

    #[test]
    fn test_store_create_and_get() {
        let (store, ids) = store_with(&["a", "b"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(ids[1]).map(|f| f.name.as_str()), Some("b"));
        assert!(store.can_undo());
    }

    #[test]
    fn test_apply_patch_returns_merged_snapshot() {
        let (mut store, ids) = store_with(&["a"]);
        let before = store.get(ids[0]).cloned().expect("field");

        let after = store
            .apply_patch(ids[0], &FieldPatch::name("renamed"))
            .expect("patch");

        assert_eq!(after.name, "renamed");
        assert_eq!(after.locations, before.locations);
        assert_eq!(store.get(ids[0]), Some(&after));
    }

    #[test]
    fn test_apply_patch_missing_field() {
        let mut store = FieldStore::new();
        let result = store.apply_patch(FieldId::new(), &FieldPatch::name("x"));
        assert!(matches!(result, Err(DesignerError::NotFound(_))));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_negative_size_rejected_without_history() {
        let (mut store, ids) = store_with(&["a"]);
        let before = store.snapshot();
        let depth = store.history.undo_depth();

        let bad = Locations::new(1, 0.0, 0.0, -5.0, 10.0);
        let result = store.apply_patch(ids[0], &FieldPatch::locations(bad));

        assert!(matches!(result, Err(DesignerError::InvalidGeometry(_))));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.history.undo_depth(), depth);
    }

    #[test]
    fn test_undo_delete_restores_position() {
        let (mut store, ids) = store_with(&["a", "b", "c"]);
        let before = store.snapshot();

        store.delete(ids[1]).expect("delete");
        assert_eq!(store.len(), 2);

        let restored = store.undo().expect("undo");
        assert_eq!(restored, before);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_delete_missing_field() {
        let (mut store, _) = store_with(&["a"]);
        assert!(matches!(
            store.delete(FieldId::new()),
            Err(DesignerError::NotFound(_))
        ));
    }

    #[test]
    fn test_redo_after_undo() {
        let (mut store, ids) = store_with(&["a"]);
        store
            .apply_patch(ids[0], &FieldPatch::default().with_required(true))
            .expect("patch");
        let patched = store.snapshot();

        store.undo().expect("undo");
        assert!(!store.fields()[0].required);

        let redone = store.redo().expect("redo");
        assert_eq!(redone, patched);
        assert!(store.redo().is_none());
    }

    #[test]
    fn test_undo_create_removes_field() {
        let mut store = FieldStore::new();
        store.create(field("a", 1)).expect("create");
        assert_eq!(store.undo(), Some(Vec::new()));
        assert!(store.undo().is_none());
        assert!(store.can_redo());
    }

    #[test]
    fn test_batch_is_single_undo_step() {
        let (mut store, _) = store_with(&["a"]);
        let before = store.snapshot();

        store
            .create_batch(vec![field("b", 1), field("c", 2)])
            .expect("batch");
        assert_eq!(store.len(), 3);

        assert_eq!(store.undo(), Some(before));
        let redone = store.redo().expect("redo");
        let names: Vec<_> = redone.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_batch_rejects_duplicates_atomically() {
        let (mut store, _) = store_with(&["a"]);
        let dup = field("b", 1);
        let result = store.create_batch(vec![dup.clone(), dup]);
        assert!(matches!(result, Err(DesignerError::InvalidAttribute { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_to_json_lists_fields() {
        let (store, _) = store_with(&["a"]);
        let json = store.to_json().expect("json");
        assert!(json.contains("\"pageNumber\": 1"));
        assert!(json.contains("\"name\": \"a\""));
    }
}
