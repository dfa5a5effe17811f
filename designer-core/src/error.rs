//! Error types for designer operations.

use thiserror::Error;

use crate::FieldId;

/// Result type for designer operations.
pub type DesignerResult<T> = Result<T, DesignerError>;

/// Errors that can occur in designer operations.
///
/// Every variant is a local validation failure. When one is returned the
/// field store, its history and all subscribers are left untouched.
#[derive(Debug, Error)]
pub enum DesignerError {
    /// Patch, delete or select target is not in the store.
    #[error("Field not found: {0}")]
    NotFound(FieldId),

    /// Geometry that cannot be committed (negative size, non-finite value).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A non-geometry attribute failed type or range validation.
    #[error("Invalid value for {attribute}: {reason}")]
    InvalidAttribute {
        /// Attribute name as seen by the editing surface.
        attribute: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// Page number outside the host document.
    #[error("Page {page} is outside the document (1..={total_pages})")]
    PageOutOfRange {
        /// Requested page.
        page: u32,
        /// Page count reported by the host.
        total_pages: u32,
    },

    /// JSON view or configuration (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DesignerError {
    pub(crate) fn invalid_attribute(
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}
