//! Outline (bookmark) facade.
//!
//! An [`Outline`] is a small `Copy` handle naming one node of a
//! [`Document`]'s outline tree. Every operation takes the owning document
//! explicitly and validates its inputs before touching the tree, so a failed
//! call leaves the document unchanged.

use pdfgraph_core::{
    ObjRef, OutlineNode, OutlineOptions, PdfError, check_range, create_item, depth_of,
    remove_subtree,
};

use crate::Document;

/// An outline item as listed by [`Document::outlines`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineEntry {
    /// The item's title.
    pub title: String,
    /// Nesting depth (0 = top-level).
    pub level: usize,
    /// 0-based index of the linked page, if the item links to a page that
    /// is still in the document.
    pub page_index: Option<usize>,
    /// Whether the item's children are shown open.
    pub expanded: bool,
}

/// Handle to a node of a document's outline tree.
///
/// Handles are only meaningful for the document that created them; passing
/// one to another document fails with [`PdfError::InvalidInput`]. Removed
/// items keep their handle valid for reads, but no longer appear in the
/// saved tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outline {
    doc_id: u64,
    node: ObjRef,
}

/// Validate a new item's position, depth and page link against `doc`,
/// returning the resolved destination page.
pub(crate) fn prepare_insertion(
    doc: &Document,
    child_count: usize,
    depth: usize,
    index: usize,
    options: &OutlineOptions,
) -> Result<Option<ObjRef>, PdfError> {
    check_range("outline", index, 0, child_count + 1)?;
    let max_depth = doc.options.max_outline_depth;
    if depth > max_depth {
        return Err(PdfError::ResourceLimitExceeded {
            limit_name: "max_outline_depth".to_string(),
            limit_value: max_depth,
            actual_value: depth,
        });
    }
    options
        .link_to_page
        .map(|page| doc.page_ref(page))
        .transpose()
}

impl Outline {
    pub(crate) fn new(doc_id: u64, node: ObjRef) -> Self {
        Self { doc_id, node }
    }

    /// The registry handle of this node.
    pub fn node_ref(self) -> ObjRef {
        self.node
    }

    fn check(self, doc: &Document) -> Result<(), PdfError> {
        if doc.ctx.id() != self.doc_id {
            return Err(PdfError::InvalidInput(format!(
                "outline {} belongs to another document",
                self.node
            )));
        }
        Ok(())
    }

    fn node(self, doc: &Document) -> Result<&OutlineNode, PdfError> {
        self.check(doc)?;
        doc.ctx.lookup_outline(self.node)
    }

    /// The node behind a non-root handle, for mutation.
    fn item_mut<'d>(
        self,
        doc: &'d mut Document,
        action: &str,
    ) -> Result<&'d mut OutlineNode, PdfError> {
        self.check(doc)?;
        let node = doc.ctx.lookup_outline_mut(self.node)?;
        if node.is_root() {
            return Err(PdfError::InvalidInput(format!(
                "cannot {action} the outline root"
            )));
        }
        Ok(node)
    }

    pub fn is_root(self, doc: &Document) -> Result<bool, PdfError> {
        Ok(self.node(doc)?.is_root())
    }

    /// The title; `None` for the root.
    pub fn title(self, doc: &Document) -> Result<Option<&str>, PdfError> {
        Ok(self.node(doc)?.title())
    }

    pub fn is_expanded(self, doc: &Document) -> Result<bool, PdfError> {
        Ok(self.node(doc)?.is_expanded())
    }

    pub fn child_count(self, doc: &Document) -> Result<usize, PdfError> {
        Ok(self.node(doc)?.child_count())
    }

    /// Direct children in display order.
    pub fn children(self, doc: &Document) -> Result<Vec<Outline>, PdfError> {
        Ok(self
            .node(doc)?
            .children()
            .iter()
            .map(|&child| Outline::new(self.doc_id, child))
            .collect())
    }

    pub fn parent(self, doc: &Document) -> Result<Option<Outline>, PdfError> {
        Ok(self
            .node(doc)?
            .parent()
            .map(|parent| Outline::new(self.doc_id, parent)))
    }

    /// Current index of the page this item links to.
    ///
    /// `None` if the item has no link or its page was removed.
    pub fn linked_page(self, doc: &Document) -> Result<Option<usize>, PdfError> {
        Ok(self
            .node(doc)?
            .dest()
            .and_then(|page| doc.page_index_of(page)))
    }

    /// Whether this node is still reachable from the outline root.
    pub fn is_attached(self, doc: &Document) -> Result<bool, PdfError> {
        let mut current = self.node;
        let mut node = self.node(doc)?;
        // Parents are always registered before their children, so the walk ends.
        while let Some(parent) = node.parent() {
            node = doc.ctx.lookup_outline(parent)?;
            if !node.children().contains(&current) {
                return Ok(false);
            }
            current = parent;
        }
        Ok(true)
    }

    /// Append a child item.
    pub fn add_outline(
        self,
        doc: &mut Document,
        title: impl Into<String>,
        options: OutlineOptions,
    ) -> Result<Outline, PdfError> {
        let index = self.child_count(doc)?;
        self.insert_outline(doc, index, title, options)
    }

    /// Insert a child item at `index` (`0..=child_count`).
    ///
    /// # Errors
    ///
    /// - [`PdfError::IndexOutOfRange`] if `index > child_count()` or
    ///   `options.link_to_page` names no page.
    /// - [`PdfError::ResourceLimitExceeded`] if the new item would be deeper
    ///   than [`DocumentOptions::max_outline_depth`](pdfgraph_core::DocumentOptions::max_outline_depth).
    /// - [`PdfError::InvalidInput`] if this handle belongs to another document.
    pub fn insert_outline(
        self,
        doc: &mut Document,
        index: usize,
        title: impl Into<String>,
        options: OutlineOptions,
    ) -> Result<Outline, PdfError> {
        let count = self.node(doc)?.child_count();
        let depth = depth_of(&doc.ctx, self.node, doc.options.max_outline_depth)? + 1;
        let dest = prepare_insertion(doc, count, depth, index, &options)?;

        let child = create_item(&mut doc.ctx, title, self.node, options.expanded)?;
        if let Some(page) = dest {
            doc.ctx.lookup_outline_mut(child)?.set_dest(page);
        }
        doc.ctx
            .lookup_outline_mut(self.node)?
            .insert_child(self.node, child, index)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(parent = %self.node, child = %child, index, "inserted outline item");
        Ok(Outline::new(self.doc_id, child))
    }

    pub fn set_title(self, doc: &mut Document, title: impl Into<String>) -> Result<(), PdfError> {
        self.item_mut(doc, "retitle")?.set_title(title);
        Ok(())
    }

    pub fn set_expanded(self, doc: &mut Document, expanded: bool) -> Result<(), PdfError> {
        self.item_mut(doc, "collapse or expand")?.set_expanded(expanded);
        Ok(())
    }

    /// Link this item to the page currently at `index`.
    ///
    /// The destination is the page object itself, so it keeps pointing at
    /// that page if pages are later reordered.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IndexOutOfRange`] if `index >= page_count()`; the
    /// previous destination is kept.
    pub fn link_to_page(self, doc: &mut Document, index: usize) -> Result<(), PdfError> {
        self.check(doc)?;
        let page = doc.page_ref(index)?;
        self.item_mut(doc, "link")?.set_dest(page);
        Ok(())
    }

    /// Detach this item and its whole subtree from the tree.
    ///
    /// Removing an item that was already removed is a no-op.
    pub fn remove(self, doc: &mut Document) -> Result<(), PdfError> {
        self.item_mut(doc, "remove")?;
        remove_subtree(&mut doc.ctx, self.node)?;
        #[cfg(feature = "tracing")]
        tracing::trace!(node = %self.node, "removed outline subtree");
        Ok(())
    }
}
