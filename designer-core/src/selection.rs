//! Selection and active-page state.

use serde::{Deserialize, Serialize};

use crate::catalog::{match_key, FieldTypeCombination};
use crate::{DesignerError, DesignerResult, Field, FieldId};

/// Which field is selected, which page is shown and which palette type is
/// armed for placement.
///
/// Ephemeral per editing session; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionController {
    selected_field_id: Option<FieldId>,
    current_page: u32,
    total_pages: u32,
    selected_type_key: Option<String>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SelectionController {
    /// Create a controller for a document with `total_pages` pages, showing
    /// page 1.
    #[must_use]
    pub fn new(total_pages: u32) -> Self {
        Self {
            selected_field_id: None,
            current_page: 1,
            total_pages,
            selected_type_key: None,
        }
    }

    /// Subset of `all_fields` on `page`, in their original relative order.
    #[must_use]
    pub fn derive_page_fields(all_fields: &[Field], page: u32) -> Vec<Field> {
        all_fields
            .iter()
            .filter(|field| field.locations.page_number == page)
            .cloned()
            .collect()
    }

    /// Select a field, or clear the selection with `None`.
    ///
    /// The active page is left alone even if the field lives elsewhere.
    pub fn select(&mut self, field: Option<FieldId>) {
        self.selected_field_id = field;
    }

    /// Currently selected field ID.
    #[must_use]
    pub const fn selected_field_id(&self) -> Option<FieldId> {
        self.selected_field_id
    }

    /// Check if `field` is the selected one.
    #[must_use]
    pub fn is_selected(&self, field: &Field) -> bool {
        self.selected_field_id == Some(field.id)
    }

    /// Clear the selection if it points at `id`. Returns whether it did.
    pub fn clear_if_selected(&mut self, id: FieldId) -> bool {
        if self.selected_field_id == Some(id) {
            self.selected_field_id = None;
            true
        } else {
            false
        }
    }

    /// Active page (1-based).
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Page count reported by the host.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Check if `page` exists in the host document.
    #[must_use]
    pub const fn contains_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }

    /// Make `page` the active page.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::PageOutOfRange`] if the page does not exist.
    pub fn set_page(&mut self, page: u32) -> DesignerResult<()> {
        if !self.contains_page(page) {
            return Err(DesignerError::PageOutOfRange {
                page,
                total_pages: self.total_pages,
            });
        }
        self.current_page = page;
        Ok(())
    }

    /// Update the page count. The active page is pulled back inside the
    /// document if it no longer exists. Returns whether the active page moved.
    ///
    /// An empty document keeps page 1 as a placeholder active page; it is not
    /// a valid target until a page exists.
    pub fn set_total_pages(&mut self, total_pages: u32) -> bool {
        self.total_pages = total_pages;
        let clamped = self.current_page.min(total_pages).max(1);
        let moved = clamped != self.current_page;
        self.current_page = clamped;
        moved
    }

    /// Advance one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Arm a palette type for placement, or disarm with `None`.
    pub fn select_type(&mut self, combo: Option<&FieldTypeCombination>) {
        self.selected_type_key = combo.map(match_key);
    }

    /// Key of the armed palette type.
    #[must_use]
    pub fn selected_type_key(&self) -> Option<&str> {
        self.selected_type_key.as_deref()
    }

    /// Check if `combo` is the armed palette type.
    #[must_use]
    pub fn is_type_selected(&self, combo: &FieldTypeCombination) -> bool {
        self.selected_type_key.as_deref() == Some(match_key(combo).as_str())
    }
}
