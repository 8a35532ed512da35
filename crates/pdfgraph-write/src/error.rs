//! Error types for the writer layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`WriterError`]
//! that wraps writer-specific errors and converts them to [`PdfError`].

use pdfgraph_core::PdfError;
use thiserror::Error;

/// Error type for serialization backend operations.
#[derive(Debug, Error)]
pub enum WriterError {
    /// A name identifier is not present in the context's name table.
    #[error("unknown name id {0}")]
    UnknownName(u32),

    /// The backend failed to encode the document.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Error writing output bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A core library error (e.g., a broken catalog reference).
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<WriterError> for PdfError {
    fn from(err: WriterError) -> Self {
        match err {
            WriterError::UnknownName(id) => {
                PdfError::WriteError(format!("unknown name id {id}"))
            }
            WriterError::Serialize(msg) => PdfError::WriteError(msg),
            WriterError::Io(e) => PdfError::IoError(e.to_string()),
            WriterError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfgraph_core::ObjRef;

    #[test]
    fn writer_error_serialize() {
        let err = WriterError::Serialize("xref overflow".to_string());
        assert_eq!(err.to_string(), "serialization error: xref overflow");
    }

    #[test]
    fn writer_error_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WriteZero, "disk full");
        let err: WriterError = io_err.into();
        assert!(matches!(err, WriterError::Io(_)));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn writer_error_to_pdf_error_unknown_name() {
        let pdf_err: PdfError = WriterError::UnknownName(99).into();
        assert_eq!(pdf_err, PdfError::WriteError("unknown name id 99".to_string()));
    }

    #[test]
    fn writer_error_to_pdf_error_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let pdf_err: PdfError = WriterError::Io(io_err).into();
        assert!(matches!(pdf_err, PdfError::IoError(_)));
        assert!(pdf_err.to_string().contains("denied"));
    }

    #[test]
    fn writer_error_to_pdf_error_core_passthrough() {
        let original = PdfError::BrokenReference(ObjRef::new(3));
        let pdf_err: PdfError = WriterError::Core(original.clone()).into();
        assert_eq!(pdf_err, original);
    }

    #[test]
    fn writer_error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(WriterError::Serialize("test".to_string()));
        assert!(err.to_string().contains("test"));
    }
}
