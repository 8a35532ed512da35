//! pdfgraph-write: Byte-level serialization of pdfgraph object graphs.
//!
//! This crate implements the writer layer of pdfgraph-rs: a pluggable
//! [`PdfWriter`] trait and the [`LopdfWriter`] backend that hands a
//! [`PdfContext`](pdfgraph_core::PdfContext) to lopdf for encoding.
//! It depends on pdfgraph-core for the object model.

pub mod error;
pub mod lopdf_writer;
pub mod writer;

pub use error::WriterError;
pub use lopdf_writer::{LopdfWriter, to_lopdf_document};
pub use pdfgraph_core;
pub use writer::PdfWriter;
