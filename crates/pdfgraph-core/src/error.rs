//! Error types for pdfgraph-rs.
//!
//! Provides [`PdfError`], the single fatal error type shared by the object
//! registry, the outline tree algorithms and the document facade. Every
//! variant describes a condition that aborts the current mutation or save
//! without committing partial state.

use thiserror::Error;

use crate::object::{ObjRef, ObjectKind};

/// Fatal error types for object-graph construction and serialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PdfError {
    /// An index fell outside its valid half-open range `start..end`.
    #[error("{name} index {index} out of range (expected {start}..{end})")]
    IndexOutOfRange {
        /// What was being indexed (e.g., "outline", "page").
        name: String,
        /// The rejected index.
        index: usize,
        /// Inclusive lower bound of the valid range.
        start: usize,
        /// Exclusive upper bound of the valid range.
        end: usize,
    },
    /// A handle resolved to an object of a different kind than requested.
    #[error("object {reference} is {found}, expected {expected}")]
    TypeMismatch {
        /// The handle that was resolved.
        reference: ObjRef,
        /// The kind the caller asked for.
        expected: ObjectKind,
        /// The kind actually stored under the handle.
        found: ObjectKind,
    },
    /// A handle resolved to nothing.
    #[error("broken reference: {0} does not resolve to an object")]
    BrokenReference(ObjRef),
    /// A public operation received a value of the wrong shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A configured resource limit was exceeded.
    #[error(
        "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
    )]
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_outline_depth").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
    /// I/O error writing document bytes.
    #[error("I/O error: {0}")]
    IoError(String),
    /// The byte-level writer rejected the object graph.
    #[error("write error: {0}")]
    WriteError(String),
}

impl PdfError {
    /// Shorthand for an [`IndexOutOfRange`](PdfError::IndexOutOfRange) error.
    pub fn index_out_of_range(name: impl Into<String>, index: usize, start: usize, end: usize) -> Self {
        PdfError::IndexOutOfRange {
            name: name.into(),
            index,
            start,
            end,
        }
    }
}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Validate that `index` lies in `start..end`.
pub fn check_range(name: &str, index: usize, start: usize, end: usize) -> Result<(), PdfError> {
    if index < start || index >= end {
        return Err(PdfError::index_out_of_range(name, index, start, end));
    }
    Ok(())
}
