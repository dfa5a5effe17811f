//! # Form Designer Core
//!
//! Field state and synchronization engine for an interactive document
//! form-field designer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               designer-core                 │
//! ├─────────────────────────────────────────────┤
//! │  UpdatePipeline (single writer)             │
//! │  - Proposal normalization                   │
//! │  - Change notifications                     │
//! ├──────────────────────┬──────────────────────┤
//! │  FieldStore          │  SelectionController │
//! │  - Canonical fields  │  - Selected field    │
//! │  - Undo/redo history │  - Active page       │
//! ├──────────────────────┼──────────────────────┤
//! │  FieldTypeCatalog    │  Geometry            │
//! │  - Grouped palette   │  - Grid snapping     │
//! │  - Search filter     │  - Bounds clamping   │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! Rendering, file import/export and page layout live outside this crate and
//! talk to it only through [`UpdatePipeline`] and its notifications.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod field;
pub mod geometry;
pub mod history;
pub mod pipeline;
pub mod selection;
pub mod store;
pub mod working_copy;

pub use catalog::{match_key, FieldTypeCatalog, FieldTypeCombination, FieldTypeGroup};
pub use config::DesignerConfig;
pub use document::DocumentType;
pub use error::{DesignerError, DesignerResult};
pub use event::DesignerEvent;
pub use field::{
    Field, FieldAttribute, FieldId, FieldPatch, Locations, NewField, PositionAxis, SizeAxis,
};
pub use geometry::{clamp_non_negative, snap, GridSettings};
pub use history::{FieldChange, History, HistoryFrame};
pub use pipeline::UpdatePipeline;
pub use selection::SelectionController;
pub use store::FieldStore;
pub use working_copy::WorkingCopy;

/// Designer core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
