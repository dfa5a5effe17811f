//! # Update Pipeline
//!
//! The single writer in front of the [`FieldStore`].
//!
//! ```text
//! editing surface ──proposal──▶ UpdatePipeline ──patch──▶ FieldStore
//!                                  │  snap / clamp / validate     │ commit + history frame
//!                                  ◀──────────── snapshot ────────┘
//!                                  │
//!                                  └──broadcast──▶ subscribers (re-render)
//! ```
//!
//! Every mutation runs synchronously under `&mut self`. Validation happens
//! before the store is touched, and notifications are sent only after the
//! commit, so subscribers never observe a half-applied change.

use std::borrow::Cow;

use serde_json::Value;
use tokio::sync::broadcast;

use crate::{
    DesignerConfig, DesignerError, DesignerEvent, DesignerResult, DocumentType, Field,
    FieldAttribute, FieldId, FieldPatch, FieldStore, FieldTypeCatalog, FieldTypeCombination,
    FieldTypeGroup, GridSettings, NewField, PositionAxis, SelectionController, SizeAxis,
};

/// Receives proposals from editing surfaces, normalizes them and commits them
/// to the field store.
#[derive(Debug)]
pub struct UpdatePipeline {
    store: FieldStore,
    selection: SelectionController,
    catalog: FieldTypeCatalog,
    grid: GridSettings,
    document_type: DocumentType,
    events: broadcast::Sender<DesignerEvent>,
}

impl Default for UpdatePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdatePipeline {
    /// Create a pipeline with the default configuration and the standard
    /// catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DesignerConfig::default())
    }

    /// Create a pipeline from a configuration.
    #[must_use]
    pub fn with_config(config: DesignerConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            store: FieldStore::with_history_limit(config.history_limit),
            selection: SelectionController::new(config.total_pages),
            catalog: FieldTypeCatalog::standard(),
            grid: config.grid,
            document_type: config.document_type,
            events,
        }
    }

    /// Replace the palette catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: FieldTypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DesignerEvent> {
        self.events.subscribe()
    }

    // -----------------------------------------------------------------------
    // Read views
    // -----------------------------------------------------------------------

    /// The canonical store, read-only.
    #[must_use]
    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    /// All fields in store order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        self.store.fields()
    }

    /// Get a field by ID.
    #[must_use]
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.store.get(id)
    }

    /// Selection and page state, read-only.
    #[must_use]
    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Snapshot of the selected field, if any.
    #[must_use]
    pub fn selected_field(&self) -> Option<&Field> {
        self.selection
            .selected_field_id()
            .and_then(|id| self.store.get(id))
    }

    /// Fields on the active page, in store order.
    #[must_use]
    pub fn page_fields(&self) -> Vec<Field> {
        SelectionController::derive_page_fields(self.store.fields(), self.selection.current_page())
    }

    /// The palette catalog.
    #[must_use]
    pub fn catalog(&self) -> &FieldTypeCatalog {
        &self.catalog
    }

    /// Palette groups filtered by `search_term`.
    #[must_use]
    pub fn palette(&self, search_term: &str) -> Cow<'_, [FieldTypeGroup]> {
        self.catalog.filter(search_term)
    }

    /// Current grid settings.
    #[must_use]
    pub const fn grid(&self) -> GridSettings {
        self.grid
    }

    /// Current document type.
    #[must_use]
    pub const fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// The field collection as pretty JSON for the host's JSON view.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn fields_json(&self) -> DesignerResult<String> {
        self.store.to_json()
    }

    // -----------------------------------------------------------------------
    // Proposals
    // -----------------------------------------------------------------------

    /// Move a field along one axis, snapping to the grid when enabled.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::NotFound`] for an unknown field and
    /// [`DesignerError::InvalidGeometry`] for a non-finite value.
    pub fn propose_position_change(
        &mut self,
        id: FieldId,
        axis: PositionAxis,
        value: f64,
    ) -> DesignerResult<Field> {
        let current = self.require(id)?;
        require_finite(&axis, value)
            .inspect_err(|e| tracing::warn!("Rejected {axis:?} change on {id}: {e}"))?;
        let locations = current
            .locations
            .with_position(axis, self.grid.normalize_position(value));
        self.commit(id, FieldPatch::locations(locations))
    }

    /// Resize a field along one axis, snapping when enabled and flooring at
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::NotFound`] for an unknown field and
    /// [`DesignerError::InvalidGeometry`] for a non-finite value.
    pub fn propose_size_change(
        &mut self,
        id: FieldId,
        axis: SizeAxis,
        value: f64,
    ) -> DesignerResult<Field> {
        let current = self.require(id)?;
        require_finite(&axis, value)
            .inspect_err(|e| tracing::warn!("Rejected {axis:?} change on {id}: {e}"))?;
        let locations = current.locations.with_size(axis, self.grid.normalize_size(value));
        self.commit(id, FieldPatch::locations(locations))
    }

    /// Change a non-geometry attribute from a loosely typed surface value.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::InvalidAttribute`] when `value` has the wrong
    /// type or range, and [`DesignerError::NotFound`] for an unknown field.
    pub fn propose_attribute_change(
        &mut self,
        id: FieldId,
        attribute: FieldAttribute,
        value: &Value,
    ) -> DesignerResult<Field> {
        let patch = attribute_patch(attribute, value)
            .inspect_err(|e| tracing::warn!("Rejected {attribute} change on {id}: {e}"))?;
        self.commit(id, patch)
    }

    /// Commit a staged patch (typically from a [`WorkingCopy`](crate::WorkingCopy)).
    ///
    /// The patch is validated but not snapped.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::NotFound`], [`DesignerError::InvalidGeometry`]
    /// or [`DesignerError::PageOutOfRange`]; the store is unchanged on error.
    pub fn commit(&mut self, id: FieldId, patch: FieldPatch) -> DesignerResult<Field> {
        let field = self
            .apply_patch(id, &patch)
            .inspect_err(|e| tracing::warn!("Rejected commit on {id}: {e}"))?;
        self.publish(DesignerEvent::FieldUpdated {
            field: field.clone(),
            fields: self.store.snapshot(),
        });
        self.publish_history();
        Ok(field)
    }

    /// Create a field from a draft.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::PageOutOfRange`] or
    /// [`DesignerError::InvalidGeometry`] for a draft that violates the field
    /// invariants.
    pub fn create_field(&mut self, draft: NewField) -> DesignerResult<Field> {
        let field = self
            .insert(draft)
            .inspect_err(|e| tracing::warn!("Rejected new field: {e}"))?;
        self.publish(DesignerEvent::FieldCreated {
            field: field.clone(),
            fields: self.store.snapshot(),
        });
        self.publish_history();
        Ok(field)
    }

    /// Create a batch of fields handed over by an import collaborator.
    ///
    /// Every draft is validated first; the batch commits as one undo step.
    ///
    /// # Errors
    ///
    /// Returns the first validation error; nothing is created in that case.
    pub fn import_fields(&mut self, drafts: Vec<NewField>) -> DesignerResult<Vec<Field>> {
        let count = drafts.len();
        let imported = self
            .insert_batch(drafts)
            .inspect_err(|e| tracing::warn!("Rejected import of {count} fields: {e}"))?;
        if imported.is_empty() {
            return Ok(imported);
        }
        tracing::info!("Imported {} fields", imported.len());
        self.publish(DesignerEvent::FieldsImported {
            imported: imported.clone(),
            fields: self.store.snapshot(),
        });
        self.publish_history();
        Ok(imported)
    }

    /// Delete a field, clearing the selection if it pointed at it.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::NotFound`] for an unknown field.
    pub fn delete_field(&mut self, id: FieldId) -> DesignerResult<Field> {
        let removed = self.store.delete(id)?;
        let deselected = self.selection.clear_if_selected(id);
        self.publish(DesignerEvent::FieldDeleted {
            field: removed.clone(),
            fields: self.store.snapshot(),
        });
        if deselected {
            self.publish(DesignerEvent::SelectionChanged { selected: None });
        }
        self.publish_history();
        Ok(removed)
    }

    /// Undo the last operation. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Vec<Field>> {
        let Some(fields) = self.store.undo() else {
            tracing::debug!("Undo requested with empty history");
            return None;
        };
        self.after_history_move(&fields);
        Some(fields)
    }

    /// Redo the last undone operation. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<Vec<Field>> {
        let Some(fields) = self.store.redo() else {
            tracing::debug!("Redo requested with nothing undone");
            return None;
        };
        self.after_history_move(&fields);
        Some(fields)
    }

    // -----------------------------------------------------------------------
    // Selection and navigation
    // -----------------------------------------------------------------------

    /// Select a field, or clear the selection with `None`.
    ///
    /// Does not navigate to the field's page.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::NotFound`] for an unknown field.
    pub fn select(&mut self, id: Option<FieldId>) -> DesignerResult<()> {
        if let Some(id) = id {
            self.require(id)?;
        }
        if self.selection.selected_field_id() != id {
            self.selection.select(id);
            self.publish(DesignerEvent::SelectionChanged { selected: id });
        }
        Ok(())
    }

    /// Show `page`.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::PageOutOfRange`] if the page does not exist.
    pub fn set_page(&mut self, page: u32) -> DesignerResult<()> {
        let previous = self.selection.current_page();
        self.selection.set_page(page)?;
        if previous != page {
            self.publish(DesignerEvent::PageChanged { page });
        }
        Ok(())
    }

    /// Show the next page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        let moved = self.selection.next_page();
        if moved {
            self.publish_page();
        }
        moved
    }

    /// Show the previous page. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        let moved = self.selection.previous_page();
        if moved {
            self.publish_page();
        }
        moved
    }

    /// Record the page count reported by the host.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        tracing::info!("Document has {total_pages} page(s)");
        if self.selection.set_total_pages(total_pages) {
            self.publish_page();
        }
    }

    /// Arm a palette type for placement, or disarm with `None`.
    pub fn select_field_type(&mut self, combo: Option<&FieldTypeCombination>) {
        self.selection.select_type(combo);
        self.publish(DesignerEvent::FieldTypeSelected {
            key: self.selection.selected_type_key().map(str::to_string),
        });
    }

    /// Place a field of the armed type on the active page.
    ///
    /// The position is snapped when enabled; size comes from the type's
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::InvalidAttribute`] when no catalog type is
    /// armed, plus any creation error.
    pub fn place_field(&mut self, left: f64, top: f64) -> DesignerResult<Field> {
        let combo = self
            .selection
            .selected_type_key()
            .and_then(|key| self.catalog.find(key))
            .ok_or_else(|| {
                DesignerError::invalid_attribute("fieldType", "no catalog field type is selected")
            })?;
        let draft = combo.to_new_field(
            self.selection.current_page(),
            self.grid.normalize_position(left),
            self.grid.normalize_position(top),
        );
        self.create_field(draft)
    }

    // -----------------------------------------------------------------------
    // Grid and document
    // -----------------------------------------------------------------------

    /// Enable or disable snapping.
    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.grid.snap_to_grid = enabled;
        self.publish_grid();
    }

    /// Show or hide the grid.
    pub fn set_show_grid(&mut self, visible: bool) {
        self.grid.show_grid = visible;
        self.publish_grid();
    }

    /// Change the grid spacing.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::InvalidAttribute`] unless `size` is a positive
    /// finite number.
    pub fn set_grid_size(&mut self, size: f64) -> DesignerResult<()> {
        if !(size.is_finite() && size > 0.0) {
            return Err(DesignerError::invalid_attribute(
                "grid.size",
                format!("must be a positive number, got {size}"),
            ));
        }
        self.grid.size = size;
        self.publish_grid();
        Ok(())
    }

    /// Record the document type chosen in the host toolbar.
    pub fn set_document_type(&mut self, document_type: DocumentType) {
        if self.document_type != document_type {
            tracing::info!("Document type set to {document_type}");
            self.document_type = document_type;
            self.publish(DesignerEvent::DocumentTypeChanged { document_type });
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn require(&self, id: FieldId) -> DesignerResult<&Field> {
        self.store.get(id).ok_or(DesignerError::NotFound(id))
    }

    fn apply_patch(&mut self, id: FieldId, patch: &FieldPatch) -> DesignerResult<Field> {
        if let Some(locations) = &patch.locations {
            self.check_page(locations.page_number)?;
        }
        self.store.apply_patch(id, patch)
    }

    fn insert(&mut self, draft: NewField) -> DesignerResult<Field> {
        self.check_page(draft.locations.page_number)?;
        self.store.create(draft.into_field(FieldId::new()))
    }

    fn insert_batch(&mut self, drafts: Vec<NewField>) -> DesignerResult<Vec<Field>> {
        for draft in &drafts {
            self.check_page(draft.locations.page_number)?;
        }
        let batch = drafts
            .into_iter()
            .map(|draft| draft.into_field(FieldId::new()))
            .collect();
        self.store.create_batch(batch)
    }

    fn check_page(&self, page: u32) -> DesignerResult<()> {
        if self.selection.contains_page(page) {
            Ok(())
        } else {
            Err(DesignerError::PageOutOfRange {
                page,
                total_pages: self.selection.total_pages(),
            })
        }
    }

    fn after_history_move(&mut self, fields: &[Field]) {
        self.publish(DesignerEvent::HistoryApplied {
            fields: fields.to_vec(),
        });
        if let Some(selected) = self.selection.selected_field_id() {
            if !self.store.contains(selected) {
                self.selection.select(None);
                self.publish(DesignerEvent::SelectionChanged { selected: None });
            }
        }
        self.publish_history();
    }

    fn publish_history(&self) {
        self.publish(DesignerEvent::HistoryChanged {
            can_undo: self.store.can_undo(),
            can_redo: self.store.can_redo(),
        });
    }

    fn publish_page(&self) {
        self.publish(DesignerEvent::PageChanged {
            page: self.selection.current_page(),
        });
    }

    fn publish_grid(&self) {
        self.publish(DesignerEvent::GridChanged { grid: self.grid });
    }

    fn publish(&self, event: DesignerEvent) {
        if let Err(e) = self.events.send(event) {
            // No subscribers yet is normal.
            tracing::debug!("Broadcast skipped: no receivers ({e})");
        }
    }
}

/// Reject NaN and infinities before snapping or clamping can hide them.
fn require_finite(axis: &impl std::fmt::Debug, value: f64) -> DesignerResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DesignerError::InvalidGeometry(format!(
            "{axis:?} must be a finite number, got {value}"
        )))
    }
}

/// Validate a surface value and turn it into a single-attribute patch.
fn attribute_patch(attribute: FieldAttribute, value: &Value) -> DesignerResult<FieldPatch> {
    let mismatch = |expected: &str| {
        DesignerError::invalid_attribute(
            attribute.as_str(),
            format!("expected {expected}, got {value}"),
        )
    };
    let patch = match attribute {
        FieldAttribute::Name => {
            FieldPatch::name(value.as_str().ok_or_else(|| mismatch("a string"))?)
        }
        FieldAttribute::Required => {
            let required = value.as_bool().ok_or_else(|| mismatch("a boolean"))?;
            FieldPatch::default().with_required(required)
        }
        FieldAttribute::ReadOnly => {
            let read_only = value.as_bool().ok_or_else(|| mismatch("a boolean"))?;
            FieldPatch::default().with_read_only(read_only)
        }
        FieldAttribute::RecipientIndex => {
            let index = value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| mismatch("a non-negative integer"))?;
            FieldPatch::default().with_recipient_index(index)
        }
    };
    Ok(patch)
}
