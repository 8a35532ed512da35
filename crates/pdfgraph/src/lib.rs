//! pdfgraph: Build PDF object graphs with outlines and serialize them.
//!
//! This is the public API facade crate for pdfgraph-rs. It re-exports types
//! from pdfgraph-core and uses pdfgraph-write for serialization.
//!
//! # Architecture
//!
//! - **pdfgraph-core**: Object registry, name interning and outline tree algorithms
//! - **pdfgraph-write**: Byte-level serialization (lopdf backend)
//! - **pdfgraph** (this crate): [`Document`] and the [`Outline`] facade
//!
//! # Example
//!
//! ```ignore
//! let mut doc = Document::new()?;
//! doc.add_page()?;
//! doc.add_page()?;
//! let chapter = doc.add_outline("Chapter 1", OutlineOptions::expanded().link_to_page(0))?;
//! chapter.add_outline(&mut doc, "Section 1.1", OutlineOptions::default().link_to_page(1))?;
//! let bytes = doc.save()?;
//! ```

mod document;
mod outline;

pub use document::Document;
pub use outline::{Outline, OutlineEntry};
pub use pdfgraph_core;
pub use pdfgraph_core::{
    CollapsedCount, DocumentOptions, ObjRef, ObjectKind, OutlineOptions, PdfError,
};
pub use pdfgraph_write;
