//! Document and outline configuration.
//!
//! [`DocumentOptions`] bounds the outline tree and controls how derived
//! fields are emitted; [`OutlineOptions`] is the per-item record accepted
//! when an outline is created.

/// How a collapsed outline item's own `/Count` entry is emitted.
///
/// A collapsed item always contributes `0` to its parent's visible count,
/// whichever variant is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollapsedCount {
    /// Collapsed items carry no `/Count` entry.
    #[default]
    Omit,
    /// Collapsed items with descendants carry a negative `/Count` whose
    /// absolute value is the number of descendants that would be visible
    /// if the item were opened.
    Signed,
}

/// Options controlling document construction and serialization.
///
/// Provides sensible defaults for all settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// Maximum outline nesting depth below the root (default: 256).
    pub max_outline_depth: usize,
    /// Emission policy for collapsed items' `/Count` (default: [`CollapsedCount::Omit`]).
    pub collapsed_count: CollapsedCount,
    /// Whether creating the outline root sets `/PageMode /UseOutlines` on the
    /// catalog (default: true).
    pub use_outlines_page_mode: bool,
    /// Version written to the file header (default: "1.7").
    pub pdf_version: String,
    /// MediaBox for pages created by the document (default: US Letter).
    pub default_media_box: [f64; 4],
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            max_outline_depth: 256,
            collapsed_count: CollapsedCount::Omit,
            use_outlines_page_mode: true,
            pdf_version: "1.7".to_string(),
            default_media_box: [0.0, 0.0, 612.0, 792.0],
        }
    }
}

/// Per-item options for a new outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineOptions {
    /// Whether the item's children are shown open when the document loads.
    pub expanded: bool,
    /// Zero-based index of the page the item links to.
    pub link_to_page: Option<usize>,
}

impl OutlineOptions {
    /// Options for an expanded item without a link.
    pub fn expanded() -> Self {
        Self {
            expanded: true,
            link_to_page: None,
        }
    }

    /// Set the page link target (builder pattern).
    pub fn link_to_page(mut self, index: usize) -> Self {
        self.link_to_page = Some(index);
        self
    }
}
