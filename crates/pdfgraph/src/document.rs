//! Top-level document type tying the registry, the page list and the outline
//! tree together.

use std::io::Write;

use pdfgraph_core::{
    Dictionary, DocumentOptions, ObjRef, OutlineNode, OutlineOptions, PdfContext, PdfError,
    PdfName, PdfObject, check_range, finalize, pre_order,
};
use pdfgraph_write::{LopdfWriter, PdfWriter};

use crate::outline::{Outline, OutlineEntry, prepare_insertion};

/// A PDF document under construction.
///
/// Owns the object registry, the catalog, the page tree and the lazily
/// created outline root. Outline items are manipulated through [`Outline`]
/// handles returned by [`Document::add_outline`] and friends.
///
/// # Example
///
/// ```ignore
/// let mut doc = Document::new()?;
/// doc.add_page()?;
/// let intro = doc.add_outline("Intro", OutlineOptions::default().link_to_page(0))?;
/// intro.set_expanded(&mut doc, true)?;
/// let bytes = doc.save()?;
/// ```
#[derive(Debug)]
pub struct Document {
    pub(crate) ctx: PdfContext,
    pub(crate) options: DocumentOptions,
    catalog: ObjRef,
    pages_root: ObjRef,
    /// Page handles in display order.
    pages: Vec<ObjRef>,
    outline_root: Option<ObjRef>,
}

impl Document {
    /// Create an empty document with default options.
    pub fn new() -> Result<Self, PdfError> {
        Self::with_options(DocumentOptions::default())
    }

    /// Create an empty document: a catalog and an empty page tree.
    pub fn with_options(options: DocumentOptions) -> Result<Self, PdfError> {
        let mut ctx = PdfContext::new();

        let mut pages = Dictionary::new();
        pages.set(PdfName::TYPE, PdfName::PAGES);
        pages.set(PdfName::KIDS, Vec::<PdfObject>::new());
        pages.set(PdfName::COUNT, 0_i64);
        let pages_root = ctx.register(pages)?;

        let mut catalog = Dictionary::new();
        catalog.set(PdfName::TYPE, PdfName::CATALOG);
        catalog.set(PdfName::PAGES, pages_root);
        let catalog = ctx.register(catalog)?;

        Ok(Self {
            ctx,
            options,
            catalog,
            pages_root,
            pages: Vec::new(),
            outline_root: None,
        })
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// The underlying object registry.
    pub fn context(&self) -> &PdfContext {
        &self.ctx
    }

    /// Mutable access to the registry, for objects the document does not
    /// model itself.
    pub fn context_mut(&mut self) -> &mut PdfContext {
        &mut self.ctx
    }

    /// Handle of the document catalog.
    pub fn catalog(&self) -> ObjRef {
        self.catalog
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Handle of the page currently at `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IndexOutOfRange`] if `index >= page_count()`.
    pub fn page_ref(&self, index: usize) -> Result<ObjRef, PdfError> {
        check_range("page", index, 0, self.pages.len())?;
        Ok(self.pages[index])
    }

    /// Current index of `page`, if it is still part of the page tree.
    pub fn page_index_of(&self, page: ObjRef) -> Option<usize> {
        self.pages.iter().position(|&p| p == page)
    }

    /// Append a blank page using [`DocumentOptions::default_media_box`].
    pub fn add_page(&mut self) -> Result<ObjRef, PdfError> {
        self.insert_page(self.pages.len())
    }

    /// Insert a blank page so that it ends up at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IndexOutOfRange`] if `index > page_count()`.
    pub fn insert_page(&mut self, index: usize) -> Result<ObjRef, PdfError> {
        check_range("page", index, 0, self.pages.len() + 1)?;

        let media_box: Vec<PdfObject> = self
            .options
            .default_media_box
            .iter()
            .map(|&v| PdfObject::Real(v))
            .collect();
        let mut page = Dictionary::new();
        page.set(PdfName::TYPE, PdfName::PAGE);
        page.set(PdfName::PARENT, self.pages_root);
        page.set(PdfName::MEDIA_BOX, media_box);
        let page = self.ctx.register(page)?;

        self.pages.insert(index, page);
        self.sync_page_tree()?;
        Ok(page)
    }

    /// Detach the page at `index` from the page tree and return its handle.
    ///
    /// The page object stays registered; outline items that linked to it
    /// keep their destination until relinked.
    pub fn remove_page(&mut self, index: usize) -> Result<ObjRef, PdfError> {
        check_range("page", index, 0, self.pages.len())?;
        let page = self.pages.remove(index);
        self.sync_page_tree()?;
        Ok(page)
    }

    /// Move the page at `from` so that it ends up at `to`.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<(), PdfError> {
        check_range("page", from, 0, self.pages.len())?;
        check_range("page", to, 0, self.pages.len())?;
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        self.sync_page_tree()
    }

    fn sync_page_tree(&mut self) -> Result<(), PdfError> {
        let kids: Vec<PdfObject> = self.pages.iter().map(|&p| PdfObject::Reference(p)).collect();
        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
        let pages = self.ctx.lookup_dict_mut(self.pages_root)?;
        pages.set(PdfName::KIDS, kids);
        pages.set(PdfName::COUNT, count);
        Ok(())
    }

    /// The outline root, if any outline item was ever created.
    pub fn outline_root(&self) -> Option<Outline> {
        self.outline_root
            .map(|root| Outline::new(self.ctx.id(), root))
    }

    /// The outline root, creating it on first use.
    ///
    /// Creating the root links it from the catalog's `/Outlines` and, unless
    /// disabled by [`DocumentOptions::use_outlines_page_mode`], sets
    /// `/PageMode /UseOutlines` so viewers open the bookmarks panel.
    pub fn ensure_outline_root(&mut self) -> Result<Outline, PdfError> {
        if let Some(root) = self.outline_root() {
            return Ok(root);
        }
        let root = self.ctx.register(OutlineNode::root())?;
        let use_outlines = self.options.use_outlines_page_mode;
        let catalog = self.ctx.lookup_dict_mut(self.catalog)?;
        catalog.set(PdfName::OUTLINES, root);
        if use_outlines {
            catalog.set(PdfName::PAGE_MODE, PdfName::USE_OUTLINES);
        }
        self.outline_root = Some(root);
        #[cfg(feature = "tracing")]
        tracing::debug!(root = %root, "created outline root");
        Ok(Outline::new(self.ctx.id(), root))
    }

    /// Append a top-level outline item.
    pub fn add_outline(
        &mut self,
        title: impl Into<String>,
        options: OutlineOptions,
    ) -> Result<Outline, PdfError> {
        let index = self.top_level_count()?;
        self.insert_outline(index, title, options)
    }

    /// Insert a top-level outline item at `index`.
    ///
    /// # Errors
    ///
    /// - [`PdfError::IndexOutOfRange`] if `index` exceeds the number of
    ///   top-level items, or `options.link_to_page` is not a valid page.
    ///
    /// On error nothing is allocated, not even the outline root.
    pub fn insert_outline(
        &mut self,
        index: usize,
        title: impl Into<String>,
        options: OutlineOptions,
    ) -> Result<Outline, PdfError> {
        let count = self.top_level_count()?;
        prepare_insertion(self, count, 1, index, &options)?;
        let root = self.ensure_outline_root()?;
        root.insert_outline(self, index, title, options)
    }

    fn top_level_count(&self) -> Result<usize, PdfError> {
        match self.outline_root {
            Some(root) => Ok(self.ctx.lookup_outline(root)?.child_count()),
            None => Ok(0),
        }
    }

    /// Every outline item in display order, with its nesting level
    /// (top-level items at level 0) and the index of the page it links to.
    pub fn outlines(&self) -> Result<Vec<OutlineEntry>, PdfError> {
        let Some(root) = self.outline_root else {
            return Ok(Vec::new());
        };
        pre_order(&self.ctx, root, self.options.max_outline_depth)?
            .into_iter()
            .map(|(node, level)| {
                let node = self.ctx.lookup_outline(node)?;
                Ok(OutlineEntry {
                    title: node.title().unwrap_or_default().to_string(),
                    level,
                    page_index: node.dest().and_then(|page| self.page_index_of(page)),
                    expanded: node.is_expanded(),
                })
            })
            .collect()
    }

    /// Write the derived outline fields. Returns the root's visible count,
    /// or 0 when the document has no outline.
    ///
    /// [`save`](Self::save) calls this itself.
    pub fn finalize_outlines(&mut self) -> Result<usize, PdfError> {
        match self.outline_root {
            Some(root) => finalize(&mut self.ctx, root, &self.options),
            None => Ok(0),
        }
    }

    /// Finalize the outline and serialize the document.
    pub fn save(&mut self) -> Result<Vec<u8>, PdfError> {
        self.finalize_outlines()?;
        let bytes = LopdfWriter::write(&self.ctx, self.catalog, &self.options)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            pages = self.pages.len(),
            bytes = bytes.len(),
            "saved document"
        );
        Ok(bytes)
    }

    /// Finalize the outline and write the document to `target`.
    pub fn save_to<W: Write>(&mut self, target: &mut W) -> Result<(), PdfError> {
        self.finalize_outlines()?;
        LopdfWriter::write_to(&self.ctx, self.catalog, &self.options, target)?;
        Ok(())
    }

    /// Finalize the outline and write the document to a file at `path`.
    #[cfg(feature = "std")]
    pub fn save_to_file<P: AsRef<std::path::Path>>(&mut self, path: P) -> Result<(), PdfError> {
        let bytes = self.save()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
