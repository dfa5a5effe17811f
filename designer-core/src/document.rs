//! Host document metadata consumed by the core.

use serde::{Deserialize, Serialize};

/// Lifecycle class of the host document.
///
/// Exposed read-only so the toolbar can decide which actions make sense. The
/// field model never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// Uploaded for a single agreement and discarded afterwards.
    #[default]
    Transient,
    /// Stored in the account's document library for reuse.
    Library,
    /// Fetched from a remote URL.
    Url,
}

impl DocumentType {
    /// Wire name of the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "TRANSIENT",
            Self::Library => "LIBRARY",
            Self::Url => "URL",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
