//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::{DesignerError, DesignerResult, DocumentType, GridSettings};

/// Default buffer size of the notification channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Configuration for an editing session.
///
/// Every field has a default, so a partial JSON object is enough:
///
/// ```
/// use designer_core::DesignerConfig;
///
/// let config = DesignerConfig::from_json(r#"{"grid": {"snapToGrid": true}}"#).unwrap();
/// assert!(config.grid.snap_to_grid);
/// assert_eq!(config.history_limit, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignerConfig {
    /// Initial grid settings.
    pub grid: GridSettings,
    /// Maximum undo frames kept (0 = unlimited).
    pub history_limit: usize,
    /// Buffer size of the notification channel. Slow subscribers that fall
    /// further behind than this see a lag error and skip ahead.
    pub event_capacity: usize,
    /// Page count of the host document.
    pub total_pages: u32,
    /// Initial document type.
    pub document_type: DocumentType,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            total_pages: 1,
            document_type: DocumentType::default(),
        }
    }
}

impl DesignerConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::Serialization`] for malformed JSON and
    /// [`DesignerError::InvalidAttribute`] for out-of-range values.
    pub fn from_json(json: &str) -> DesignerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::InvalidAttribute`] naming the first bad value.
    pub fn validate(&self) -> DesignerResult<()> {
        if !(self.grid.size.is_finite() && self.grid.size > 0.0) {
            return Err(DesignerError::invalid_attribute(
                "grid.size",
                format!("must be a positive number, got {}", self.grid.size),
            ));
        }
        if self.event_capacity == 0 {
            return Err(DesignerError::invalid_attribute(
                "eventCapacity",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
