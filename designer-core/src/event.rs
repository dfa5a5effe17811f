//! Notifications published to editing surfaces.
//!
//! Every event carries whole-object snapshots. Subscribers re-render from
//! them and never need to reconstruct state from a partial diff.

use serde::{Deserialize, Serialize};

use crate::{DocumentType, Field, FieldId, GridSettings};

/// A change published by the [`UpdatePipeline`](crate::UpdatePipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DesignerEvent {
    /// A field was created.
    FieldCreated {
        /// The new field.
        field: Field,
        /// Full collection after the change.
        fields: Vec<Field>,
    },
    /// A patch was committed to a field.
    FieldUpdated {
        /// The merged field.
        field: Field,
        /// Full collection after the change.
        fields: Vec<Field>,
    },
    /// A field was removed.
    FieldDeleted {
        /// Last snapshot of the removed field.
        field: Field,
        /// Full collection after the change.
        fields: Vec<Field>,
    },
    /// A batch of fields was imported as one step.
    FieldsImported {
        /// The imported fields in insertion order.
        imported: Vec<Field>,
        /// Full collection after the change.
        fields: Vec<Field>,
    },
    /// Undo or redo replaced the collection.
    HistoryApplied {
        /// Full collection after the history move.
        fields: Vec<Field>,
    },
    /// Availability of undo/redo changed or was recomputed.
    HistoryChanged {
        /// Whether undo is available.
        can_undo: bool,
        /// Whether redo is available.
        can_redo: bool,
    },
    /// The selected field changed.
    SelectionChanged {
        /// Newly selected field, if any.
        selected: Option<FieldId>,
    },
    /// The active page changed.
    PageChanged {
        /// New active page.
        page: u32,
    },
    /// The armed palette type changed.
    FieldTypeSelected {
        /// Match key of the armed type, if any.
        key: Option<String>,
    },
    /// Grid settings changed.
    GridChanged {
        /// New grid settings.
        grid: GridSettings,
    },
    /// The host switched the document type.
    DocumentTypeChanged {
        /// New document type.
        document_type: DocumentType,
    },
}

impl DesignerEvent {
    /// Full field collection carried by this event, if it is a collection
    /// change.
    #[must_use]
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Self::FieldCreated { fields, .. }
            | Self::FieldUpdated { fields, .. }
            | Self::FieldDeleted { fields, .. }
            | Self::FieldsImported { fields, .. }
            | Self::HistoryApplied { fields } => Some(fields.as_slice()),
            _ => None,
        }
    }

    /// Check if this event changes the field collection.
    #[must_use]
    pub fn is_collection_change(&self) -> bool {
        self.fields().is_some()
    }
}
