//! Field-type catalog for the searchable palette.
//!
//! The catalog is loaded once and never mutated. Filtered views are derived
//! on every query from the canonical groups and the current search term.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{Locations, NewField};

/// A selectable field archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTypeCombination {
    /// Palette label, e.g. "Full Name".
    pub label: String,
    /// Editing widget.
    pub input_type: String,
    /// Data semantics.
    pub content_type: String,
}

impl FieldTypeCombination {
    /// Create a catalog entry.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        input_type: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            input_type: input_type.into(),
            content_type: content_type.into(),
        }
    }

    /// Canonical key used to compare this entry against a selected type.
    #[must_use]
    pub fn key(&self) -> String {
        match_key(self)
    }

    /// Default `(width, height)` for a freshly placed field of this type.
    #[must_use]
    pub fn default_size(&self) -> (f64, f64) {
        match self.input_type.as_str() {
            "SIGNATURE" => (200.0, 50.0),
            "CHECKBOX" | "RADIO" => (20.0, 20.0),
            "MULTILINE" => (200.0, 80.0),
            _ => (150.0, 30.0),
        }
    }

    /// Build a creation request for this type at the given location.
    ///
    /// The field is named after the entry label and assigned to recipient 0.
    #[must_use]
    pub fn to_new_field(&self, page_number: u32, left: f64, top: f64) -> NewField {
        let (width, height) = self.default_size();
        NewField {
            name: self.label.clone(),
            locations: Locations::new(page_number, left, top, width, height),
            recipient_index: 0,
            required: false,
            read_only: false,
            input_type: self.input_type.clone(),
            content_type: self.content_type.clone(),
        }
    }
}

/// A named bucket of catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTypeGroup {
    /// Group heading.
    pub label: String,
    /// Entries in display order.
    pub items: Vec<FieldTypeCombination>,
}

impl FieldTypeGroup {
    /// Create a group.
    #[must_use]
    pub fn new(label: impl Into<String>, items: Vec<FieldTypeCombination>) -> Self {
        Self {
            label: label.into(),
            items,
        }
    }
}

/// Canonical lowercase `label_inputType_contentType` key.
#[must_use]
pub fn match_key(combo: &FieldTypeCombination) -> String {
    format!(
        "{}_{}_{}",
        combo.label, combo.input_type, combo.content_type
    )
    .to_lowercase()
}

/// Keep only the entries whose label contains `search_term`, ignoring case.
///
/// An empty term returns `groups` borrowed as-is. Groups left without items are
/// dropped; group and item order are preserved.
#[must_use]
pub fn filter<'a>(groups: &'a [FieldTypeGroup], search_term: &str) -> Cow<'a, [FieldTypeGroup]> {
    if search_term.is_empty() {
        return Cow::Borrowed(groups);
    }
    let needle = search_term.to_lowercase();
    let filtered = groups
        .iter()
        .filter_map(|group| {
            let items: Vec<_> = group
                .items
                .iter()
                .filter(|item| item.label.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| FieldTypeGroup {
                label: group.label.clone(),
                items,
            })
        })
        .collect();
    Cow::Owned(filtered)
}

/// The catalog of field archetypes offered by the palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTypeCatalog {
    groups: Vec<FieldTypeGroup>,
}

impl FieldTypeCatalog {
    /// Create a catalog from pre-grouped entries.
    #[must_use]
    pub fn new(groups: Vec<FieldTypeGroup>) -> Self {
        Self { groups }
    }

    /// The archetypes of an e-signature form designer.
    #[must_use]
    pub fn standard() -> Self {
        let entry = |label: &str, input: &str, content: &str| {
            FieldTypeCombination::new(label, input, content)
        };
        Self::new(vec![
            FieldTypeGroup::new(
                "Signature",
                vec![
                    entry("Signature", "SIGNATURE", "SIGNATURE"),
                    entry("Initials", "SIGNATURE", "SIGNER_INITIALS"),
                    entry("Stamp", "SIGNATURE", "SIGNATURE_STAMP"),
                ],
            ),
            FieldTypeGroup::new(
                "Text",
                vec![
                    entry("Full Name", "TEXT_FIELD", "SIGNER_NAME"),
                    entry("First Name", "TEXT_FIELD", "SIGNER_FIRST_NAME"),
                    entry("Last Name", "TEXT_FIELD", "SIGNER_LAST_NAME"),
                    entry("Email", "TEXT_FIELD", "SIGNER_EMAIL"),
                    entry("Company", "TEXT_FIELD", "SIGNER_COMPANY"),
                    entry("Title", "TEXT_FIELD", "SIGNER_TITLE"),
                    entry("Text", "TEXT_FIELD", "DATA"),
                    entry("Comment", "MULTILINE", "DATA"),
                ],
            ),
            FieldTypeGroup::new(
                "Date",
                vec![
                    entry("Date Signed", "TEXT_FIELD", "SIGNATURE_DATE"),
                    entry("Date", "DATE", "DATA"),
                ],
            ),
            FieldTypeGroup::new(
                "Choice",
                vec![
                    entry("Checkbox", "CHECKBOX", "DATA"),
                    entry("Radio Button", "RADIO", "DATA"),
                    entry("Dropdown", "DROP_DOWN", "DATA"),
                ],
            ),
        ])
    }

    /// All groups in display order.
    #[must_use]
    pub fn groups(&self) -> &[FieldTypeGroup] {
        &self.groups
    }

    /// Groups filtered by `search_term`; see [`filter`].
    #[must_use]
    pub fn filter(&self, search_term: &str) -> Cow<'_, [FieldTypeGroup]> {
        filter(&self.groups, search_term)
    }

    /// Resolve a selected type key back to its entry.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&FieldTypeCombination> {
        self.groups
            .iter()
            .flat_map(|group| group.items.iter())
            .find(|item| match_key(item) == key)
    }

    /// Total number of entries across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    /// Check if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
