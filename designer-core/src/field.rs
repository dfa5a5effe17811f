//! Form fields - the placeable elements of a document.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DesignerError, DesignerResult};

/// Unique identifier for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(Uuid);

impl FieldId {
    /// Create a new unique field ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a field ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for FieldId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position and size of a field on its page, in page-local units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locations {
    /// 1-based page number.
    pub page_number: u32,
    /// Distance from the left page edge.
    pub left: f64,
    /// Distance from the top page edge.
    pub top: f64,
    /// Width, never negative.
    pub width: f64,
    /// Height, never negative.
    pub height: f64,
}

impl Locations {
    /// Create a location on the given page.
    #[must_use]
    pub const fn new(page_number: u32, left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            page_number,
            left,
            top,
            width,
            height,
        }
    }

    /// Copy of these locations with a single position axis replaced.
    #[must_use]
    pub fn with_position(mut self, axis: PositionAxis, value: f64) -> Self {
        match axis {
            PositionAxis::Left => self.left = value,
            PositionAxis::Top => self.top = value,
        }
        self
    }

    /// Copy of these locations with a single size axis replaced.
    #[must_use]
    pub fn with_size(mut self, axis: SizeAxis, value: f64) -> Self {
        match axis {
            SizeAxis::Width => self.width = value,
            SizeAxis::Height => self.height = value,
        }
        self
    }

    /// Check the geometric invariants of a committed field.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::InvalidGeometry`] for a zero page number,
    /// non-finite coordinates or a negative width/height.
    pub fn validate(&self) -> DesignerResult<()> {
        if self.page_number == 0 {
            return Err(DesignerError::InvalidGeometry(
                "page numbers start at 1".to_string(),
            ));
        }
        let axes = [
            ("left", self.left),
            ("top", self.top),
            ("width", self.width),
            ("height", self.height),
        ];
        if let Some((name, value)) = axes.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DesignerError::InvalidGeometry(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(DesignerError::InvalidGeometry(format!(
                "size must not be negative, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Position axis an editing surface can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionAxis {
    /// Horizontal offset.
    Left,
    /// Vertical offset.
    Top,
}

/// Size axis an editing surface can resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeAxis {
    /// Horizontal extent.
    Width,
    /// Vertical extent.
    Height,
}

/// Non-geometry attributes editable through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldAttribute {
    /// Display label.
    Name,
    /// Whether the recipient must fill the field.
    Required,
    /// Whether the field is locked for the recipient.
    ReadOnly,
    /// Assigned recipient.
    RecipientIndex,
}

impl FieldAttribute {
    /// Attribute name as it appears in field JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Required => "required",
            Self::ReadOnly => "readOnly",
            Self::RecipientIndex => "recipientIndex",
        }
    }
}

impl std::fmt::Display for FieldAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placeable form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Unique identifier, immutable after creation.
    pub id: FieldId,
    /// Display label.
    pub name: String,
    /// Page, position and size.
    pub locations: Locations,
    /// Index of the document recipient that fills this field.
    pub recipient_index: u32,
    /// Whether the recipient must fill the field.
    pub required: bool,
    /// Whether the field is locked for the recipient.
    pub read_only: bool,
    /// Editing widget, e.g. `TEXT_FIELD`.
    pub input_type: String,
    /// Data semantics, e.g. `SIGNER_NAME`.
    pub content_type: String,
}

/// A field that has not been assigned an ID yet.
///
/// Creation requests (placement, imports) carry these; the pipeline assigns
/// the ID when the field is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewField {
    /// Display label.
    pub name: String,
    /// Page, position and size.
    pub locations: Locations,
    /// Assigned recipient.
    #[serde(default)]
    pub recipient_index: u32,
    /// Whether the recipient must fill the field.
    #[serde(default)]
    pub required: bool,
    /// Whether the field is locked for the recipient.
    #[serde(default)]
    pub read_only: bool,
    /// Editing widget.
    pub input_type: String,
    /// Data semantics.
    pub content_type: String,
}

impl NewField {
    /// Materialize the draft under the given ID.
    #[must_use]
    pub fn into_field(self, id: FieldId) -> Field {
        Field {
            id,
            name: self.name,
            locations: self.locations,
            recipient_index: self.recipient_index,
            required: self.required,
            read_only: self.read_only,
            input_type: self.input_type,
            content_type: self.content_type,
        }
    }
}

/// A partial set of attribute changes applied atomically to one field.
///
/// `locations` is replaced as a whole, never merged axis by axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    /// New display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Complete replacement geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Locations>,
    /// New recipient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_index: Option<u32>,
    /// New required flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// New read-only flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// New editing widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// New data semantics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl FieldPatch {
    /// Patch that replaces the whole geometry.
    #[must_use]
    pub fn locations(locations: Locations) -> Self {
        Self {
            locations: Some(locations),
            ..Self::default()
        }
    }

    /// Patch that renames the field.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the required flag.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Set the read-only flag.
    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    /// Set the recipient.
    #[must_use]
    pub fn with_recipient_index(mut self, recipient_index: u32) -> Self {
        self.recipient_index = Some(recipient_index);
        self
    }

    /// Check if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produce the snapshot that results from applying this patch to `field`.
    ///
    /// The input is not modified; unpatched attributes are carried over.
    #[must_use]
    pub fn merged(&self, field: &Field) -> Field {
        let mut next = field.clone();
        if let Some(name) = &self.name {
            next.name.clone_from(name);
        }
        if let Some(locations) = self.locations {
            next.locations = locations;
        }
        if let Some(recipient_index) = self.recipient_index {
            next.recipient_index = recipient_index;
        }
        if let Some(required) = self.required {
            next.required = required;
        }
        if let Some(read_only) = self.read_only {
            next.read_only = read_only;
        }
        if let Some(input_type) = &self.input_type {
            next.input_type.clone_from(input_type);
        }
        if let Some(content_type) = &self.content_type {
            next.content_type.clone_from(content_type);
        }
        next
    }
}
