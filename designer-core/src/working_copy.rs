//! Scoped working copies for property-editing surfaces.
//!
//! A surface that stages edits (a property form, an inspector) holds a
//! [`WorkingCopy`] instead of a reference into the store. Edits land on the
//! copy and accumulate into a pending patch; the canonical field only changes
//! when [`WorkingCopy::commit`] hands that patch to the pipeline.

use crate::{
    DesignerResult, Field, FieldId, FieldPatch, PositionAxis, SizeAxis, UpdatePipeline,
};

/// Independent, disposable copy of one field under edit.
#[derive(Debug, Clone, Default)]
pub struct WorkingCopy {
    local: Option<Field>,
    pending: FieldPatch,
}

impl WorkingCopy {
    /// Create an unbound working copy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a working copy of `field`.
    #[must_use]
    pub fn of(field: &Field) -> Self {
        let mut copy = Self::new();
        copy.bind(Some(field));
        copy
    }

    /// Re-derive the copy from `field`, or unbind with `None`.
    ///
    /// The previous copy and any uncommitted edits are discarded.
    pub fn bind(&mut self, field: Option<&Field>) {
        if !self.pending.is_empty() {
            tracing::debug!(
                "Discarding uncommitted edits to {:?}",
                self.local.as_ref().map(|f| f.id)
            );
        }
        self.local = field.cloned();
        self.pending = FieldPatch::default();
    }

    /// The staged field as the surface should display it.
    #[must_use]
    pub fn field(&self) -> Option<&Field> {
        self.local.as_ref()
    }

    /// ID of the field this copy was derived from.
    #[must_use]
    pub fn source_id(&self) -> Option<FieldId> {
        self.local.as_ref().map(|f| f.id)
    }

    /// Edits staged since the last bind or commit.
    #[must_use]
    pub fn pending(&self) -> &FieldPatch {
        &self.pending
    }

    /// Check if there are staged edits.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Stage a new name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        if let Some(local) = &mut self.local {
            local.name = name.into();
            self.pending.name = Some(local.name.clone());
        }
    }

    /// Stage a position edit. The pending patch carries the full geometry.
    pub fn set_position(&mut self, axis: PositionAxis, value: f64) {
        if let Some(local) = &mut self.local {
            local.locations = local.locations.with_position(axis, value);
            self.pending.locations = Some(local.locations);
        }
    }

    /// Stage a size edit. The pending patch carries the full geometry.
    pub fn set_size(&mut self, axis: SizeAxis, value: f64) {
        if let Some(local) = &mut self.local {
            local.locations = local.locations.with_size(axis, value);
            self.pending.locations = Some(local.locations);
        }
    }

    /// Stage a recipient change.
    pub fn set_recipient_index(&mut self, recipient_index: u32) {
        if let Some(local) = &mut self.local {
            local.recipient_index = recipient_index;
            self.pending.recipient_index = Some(recipient_index);
        }
    }

    /// Stage the required flag.
    pub fn set_required(&mut self, required: bool) {
        if let Some(local) = &mut self.local {
            local.required = required;
            self.pending.required = Some(required);
        }
    }

    /// Stage the read-only flag.
    pub fn set_read_only(&mut self, read_only: bool) {
        if let Some(local) = &mut self.local {
            local.read_only = read_only;
            self.pending.read_only = Some(read_only);
        }
    }

    /// Commit staged edits through the pipeline.
    ///
    /// On success the copy is re-derived from the committed field. Returns
    /// `Ok(None)` when the copy is unbound or clean. On failure the staged
    /// edits are kept so the surface can correct them.
    ///
    /// # Errors
    ///
    /// Propagates the pipeline's validation error.
    pub fn commit(&mut self, pipeline: &mut UpdatePipeline) -> DesignerResult<Option<Field>> {
        let Some(id) = self.source_id() else {
            return Ok(None);
        };
        if self.pending.is_empty() {
            return Ok(None);
        }
        let committed = pipeline.commit(id, self.pending.clone())?;
        self.local = Some(committed.clone());
        self.pending = FieldPatch::default();
        Ok(Some(committed))
    }
}
