//! pdfgraph-core: Writer-independent object graph and outline algorithms.
//!
//! This crate provides the indirect object registry ([`PdfContext`]), the
//! name interner ([`NameTable`]), the object model ([`PdfObject`],
//! [`Dictionary`], [`ObjRef`]) and the outline tree ([`OutlineNode`] plus
//! the traversal, removal and [`finalize`] algorithms) used by pdfgraph-rs.

pub mod context;
pub mod error;
pub mod name;
pub mod object;
pub mod options;
pub mod outline;

pub use context::PdfContext;
pub use error::{PdfError, check_range};
pub use name::{NameTable, PdfName, decode_name, encode_name};
pub use object::{Dictionary, ObjRef, ObjectKind, PdfObject};
pub use options::{CollapsedCount, DocumentOptions, OutlineOptions};
pub use outline::{
    OutlineNode, create_item, depth_of, finalize, post_order, pre_order, remove_subtree,
    traverse_post_order,
};
